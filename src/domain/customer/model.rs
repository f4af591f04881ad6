//! Customer domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Electricity customer bound to one tariff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i32,
    pub name: String,
    /// kWh meter number printed on the installation
    pub meter_number: String,
    pub address: String,
    pub tariff_id: i32,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    pub fn new(
        name: impl Into<String>,
        meter_number: impl Into<String>,
        address: impl Into<String>,
        tariff_id: i32,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            meter_number: meter_number.into(),
            address: address.into(),
            tariff_id,
            created_at: Utc::now(),
        }
    }
}
