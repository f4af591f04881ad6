//! Bill domain entity

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::billing::BillBreakdown;
use crate::domain::period::BillingPeriod;
use crate::shared::errors::DomainError;

/// Payment state of a bill
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    #[default]
    Unpaid,
    Paid,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Paid => "paid",
        }
    }
}

impl std::str::FromStr for BillStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unpaid" => Ok(Self::Unpaid),
            "paid" => Ok(Self::Paid),
            other => Err(DomainError::Validation(format!("unknown bill status: {}", other))),
        }
    }
}

impl std::fmt::Display for BillStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unpaid => write!(f, "Unpaid"),
            Self::Paid => write!(f, "Paid"),
        }
    }
}

/// Bill generated from one usage record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: i32,
    pub usage_id: i32,
    pub customer_id: i32,
    pub period: BillingPeriod,
    /// Breakdown at generation time; the penalty is filled in on payment
    pub breakdown: BillBreakdown,
    pub status: BillStatus,
    pub due_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Bill {
    pub fn new(
        usage_id: i32,
        customer_id: i32,
        period: BillingPeriod,
        breakdown: BillBreakdown,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            id: 0,
            usage_id,
            customer_id,
            period,
            breakdown,
            status: BillStatus::Unpaid,
            due_date,
            created_at: Utc::now(),
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status == BillStatus::Paid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_str() {
        for status in [BillStatus::Unpaid, BillStatus::Paid] {
            assert_eq!(status.as_str().parse::<BillStatus>().unwrap(), status);
        }
        assert_eq!("PAID".parse::<BillStatus>().unwrap(), BillStatus::Paid);
        assert!(matches!(
            "lunas".parse::<BillStatus>(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn status_display() {
        assert_eq!(BillStatus::Unpaid.to_string(), "Unpaid");
        assert_eq!(BillStatus::Paid.to_string(), "Paid");
        assert_eq!(BillStatus::default(), BillStatus::Unpaid);
    }
}
