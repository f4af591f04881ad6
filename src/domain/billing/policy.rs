//! Billing constants: admin-fee tiers, penalty rate, anomaly ceiling, due day

use std::sync::OnceLock;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calculator::{self, BillBreakdown, Rupiah};
use super::validation::{self, MeterValidation};
use crate::domain::period::BillingPeriod;
use crate::domain::tariff::TariffRate;
use crate::domain::usage::UsageReading;
use crate::domain::DomainResult;
use crate::shared::errors::DomainError;

/// Flat admin fee for every power tier up to and including `max_power_va`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminFeeTier {
    pub max_power_va: i32,
    pub fee: Rupiah,
}

impl AdminFeeTier {
    pub const fn new(max_power_va: i32, fee: Rupiah) -> Self {
        Self { max_power_va, fee }
    }
}

/// Numbers the calculator works with.
///
/// `Default` is the standard PLaNner schedule; the `[billing]` config
/// section may override any field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingPolicy {
    /// Ascending by `max_power_va`, first match wins
    pub admin_fee_tiers: Vec<AdminFeeTier>,
    /// Fee for power tiers above the last threshold
    pub admin_fee_above: Rupiah,
    /// Surcharge per late month, applied to the subtotal
    pub late_penalty_rate: Decimal,
    /// Usage above this is flagged as a probable misreading
    pub usage_ceiling_kwh: Decimal,
    /// Day of the month after the period on which a bill falls due
    pub due_day: u32,
}

impl Default for BillingPolicy {
    fn default() -> Self {
        Self {
            admin_fee_tiers: vec![
                AdminFeeTier::new(900, 2500),
                AdminFeeTier::new(1300, 3500),
                AdminFeeTier::new(2200, 4000),
            ],
            admin_fee_above: 5000,
            late_penalty_rate: Decimal::new(2, 2),
            usage_ceiling_kwh: Decimal::from(2000),
            due_day: 20,
        }
    }
}

impl BillingPolicy {
    /// Shared instance of the default schedule.
    pub fn standard() -> &'static BillingPolicy {
        static STANDARD: OnceLock<BillingPolicy> = OnceLock::new();
        STANDARD.get_or_init(BillingPolicy::default)
    }

    pub fn admin_fee(&self, power_tier: i32) -> Rupiah {
        self.admin_fee_tiers
            .iter()
            .find(|tier| power_tier <= tier.max_power_va)
            .map(|tier| tier.fee)
            .unwrap_or(self.admin_fee_above)
    }

    pub fn late_penalty(&self, subtotal: Rupiah, months_late: i32) -> Rupiah {
        calculator::late_penalty_at_rate(subtotal, months_late, self.late_penalty_rate)
    }

    pub fn calculate(
        &self,
        reading: &UsageReading,
        tariff: &TariffRate,
        months_late: i32,
    ) -> BillBreakdown {
        let usage_kwh = calculator::compute_usage_kwh(reading);
        let energy_cost = calculator::energy_cost(usage_kwh, tariff.rate_per_kwh);
        let admin_fee = self.admin_fee(tariff.power_tier);
        let subtotal = energy_cost.saturating_add(admin_fee);
        let late_penalty = self.late_penalty(subtotal, months_late);

        BillBreakdown::new(usage_kwh, energy_cost, admin_fee, late_penalty)
    }

    pub fn validate_reading(&self, meter_start: Decimal, meter_end: Decimal) -> MeterValidation {
        validation::check_reading(meter_start, meter_end, self.usage_ceiling_kwh)
    }

    /// Due date of a bill for `period`: `due_day` of the following month.
    pub fn due_date(&self, period: BillingPeriod) -> Option<NaiveDate> {
        period.next().day(self.due_day)
    }

    pub fn validate(&self) -> DomainResult<()> {
        let mut previous: Option<i32> = None;
        for tier in &self.admin_fee_tiers {
            if previous.is_some_and(|p| tier.max_power_va <= p) {
                return Err(DomainError::Validation(format!(
                    "admin fee tiers must be strictly ascending, {} follows {}",
                    tier.max_power_va,
                    previous.unwrap_or_default()
                )));
            }
            if tier.fee < 0 {
                return Err(DomainError::Validation(format!(
                    "admin fee for tier {} must not be negative",
                    tier.max_power_va
                )));
            }
            previous = Some(tier.max_power_va);
        }

        if self.admin_fee_above < 0 {
            return Err(DomainError::Validation(
                "admin_fee_above must not be negative".to_string(),
            ));
        }
        if self.late_penalty_rate < Decimal::ZERO {
            return Err(DomainError::Validation(
                "late_penalty_rate must not be negative".to_string(),
            ));
        }
        if self.usage_ceiling_kwh <= Decimal::ZERO {
            return Err(DomainError::Validation(
                "usage_ceiling_kwh must be positive".to_string(),
            ));
        }
        if !(1..=28).contains(&self.due_day) {
            return Err(DomainError::Validation(format!(
                "due_day must be between 1 and 28, got {}",
                self.due_day
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
    fn default_policy_is_valid() {
        assert!(BillingPolicy::default().validate().is_ok());
        assert_eq!(BillingPolicy::standard(), &BillingPolicy::default());
    }

    #[test]
    fn custom_tiers_are_used() {
        let policy = BillingPolicy {
            admin_fee_tiers: vec![AdminFeeTier::new(450, 1000)],
            admin_fee_above: 9000,
            ..BillingPolicy::default()
        };
        assert_eq!(policy.admin_fee(450), 1000);
        assert_eq!(policy.admin_fee(451), 9000);
    }

    #[test]
    fn empty_tier_table_charges_flat_fee() {
        let policy = BillingPolicy {
            admin_fee_tiers: Vec::new(),
            admin_fee_above: 2500,
            ..BillingPolicy::default()
        };
        assert_eq!(policy.admin_fee(450), 2500);
        assert_eq!(policy.admin_fee(6600), 2500);
    }

    #[test]
    fn custom_penalty_rate() {
        let policy = BillingPolicy {
            late_penalty_rate: dec!(0.05),
            ..BillingPolicy::default()
        };
        assert_eq!(policy.late_penalty(10_000, 3), 1500);
    }

    #[test]
    fn due_date_is_in_following_month() {
        let policy = BillingPolicy::default();
        let period = BillingPeriod::new(12, 2024).unwrap();
        assert_eq!(policy.due_date(period), NaiveDate::from_ymd_opt(2025, 1, 20));
    }

    #[test]
    fn rejects_unsorted_tiers() {
        let policy = BillingPolicy {
            admin_fee_tiers: vec![AdminFeeTier::new(1300, 3500), AdminFeeTier::new(900, 2500)],
            ..BillingPolicy::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn rejects_bad_numbers() {
        let negative_rate = BillingPolicy {
            late_penalty_rate: dec!(-0.01),
            ..BillingPolicy::default()
        };
        assert!(negative_rate.validate().is_err());

        let bad_day = BillingPolicy {
            due_day: 31,
            ..BillingPolicy::default()
        };
        assert!(bad_day.validate().is_err());

        let zero_ceiling = BillingPolicy {
            usage_ceiling_kwh: Decimal::ZERO,
            ..BillingPolicy::default()
        };
        assert!(zero_ceiling.validate().is_err());
    }
}
