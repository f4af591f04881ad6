//! Tariff rate keyed by subscribed power

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::DomainResult;
use crate::shared::errors::DomainError;

/// Price per kWh for one power tier (VA).
///
/// The calculator treats a tariff as a read-only lookup value; callers are
/// expected to run [`TariffRate::validate`] before storing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TariffRate {
    pub id: i32,
    /// Subscribed capacity in VA (450, 900, 1300, ...)
    pub power_tier: i32,
    /// Price of one kWh in Rupiah
    pub rate_per_kwh: Decimal,
}

impl TariffRate {
    /// Unsaved tariff, the repository assigns the id.
    pub fn new(power_tier: i32, rate_per_kwh: Decimal) -> Self {
        Self {
            id: 0,
            power_tier,
            rate_per_kwh,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.power_tier <= 0 {
            return Err(DomainError::Validation(format!(
                "power_tier must be positive, got {}",
                self.power_tier
            )));
        }
        if self.rate_per_kwh <= Decimal::ZERO {
            return Err(DomainError::Validation(format!(
                "rate_per_kwh must be positive, got {}",
                self.rate_per_kwh
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn valid_tariff() {
        assert!(TariffRate::new(900, dec!(1352.0)).validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_tier() {
        assert!(TariffRate::new(0, dec!(1352)).validate().is_err());
        assert!(TariffRate::new(-450, dec!(1352)).validate().is_err());
    }

    #[test]
    fn rejects_non_positive_rate() {
        assert!(TariffRate::new(900, Decimal::ZERO).validate().is_err());
        assert!(TariffRate::new(900, dec!(-1)).validate().is_err());
    }
}
