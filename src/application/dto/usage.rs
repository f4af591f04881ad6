//! Usage request DTOs

use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

/// Meter readings for one customer and period.
///
/// Field rules are checked here; the readings themselves go through
/// `validate_meter_reading` in the service.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecordUsageRequest {
    #[validate(range(min = 1, message = "customer_id must be positive"))]
    pub customer_id: i32,
    #[validate(range(min = 1, max = 12, message = "month must be between 1 and 12"))]
    pub month: u32,
    #[validate(range(min = 2000, max = 2100, message = "year must be between 2000 and 2100"))]
    pub year: i32,
    pub meter_start: Decimal,
    pub meter_end: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUsageRequest {
    pub meter_start: Option<Decimal>,
    pub meter_end: Option<Decimal>,
}
