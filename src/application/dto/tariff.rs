//! Tariff request DTOs

use rust_decimal::Decimal;
use serde::Deserialize;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTariffRequest {
    #[validate(range(min = 1, message = "power_tier must be positive"))]
    pub power_tier: i32,
    #[validate(custom(function = "positive_rate"))]
    pub rate_per_kwh: Decimal,
}

/// Partial update; the merged tariff is checked with `TariffRate::validate`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTariffRequest {
    pub power_tier: Option<i32>,
    pub rate_per_kwh: Option<Decimal>,
}

fn positive_rate(rate: &Decimal) -> Result<(), ValidationError> {
    if *rate > Decimal::ZERO {
        return Ok(());
    }
    let mut err = ValidationError::new("positive");
    err.message = Some("rate_per_kwh must be positive".into());
    Err(err)
}
