//! Meter usage entities

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::period::BillingPeriod;

/// Pair of cumulative meter readings for one billing period.
///
/// The period is informational only, the calculator never uses it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageReading {
    pub meter_start: Decimal,
    pub meter_end: Decimal,
    pub period: BillingPeriod,
}

impl UsageReading {
    pub fn new(meter_start: Decimal, meter_end: Decimal, period: BillingPeriod) -> Self {
        Self {
            meter_start,
            meter_end,
            period,
        }
    }
}

/// Stored usage of one customer for one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub id: i32,
    pub customer_id: i32,
    pub reading: UsageReading,
    pub recorded_at: DateTime<Utc>,
}

impl UsageRecord {
    pub fn new(customer_id: i32, reading: UsageReading) -> Self {
        Self {
            id: 0,
            customer_id,
            reading,
            recorded_at: Utc::now(),
        }
    }

    pub fn period(&self) -> BillingPeriod {
        self.reading.period
    }
}
