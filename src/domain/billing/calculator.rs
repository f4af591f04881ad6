//! Bill calculation
//!
//! Every function here is pure: no I/O, no shared mutable state, no errors.
//! Out-of-range inputs are clamped or saturated, never rejected; rejecting
//! a reading is [`validate_meter_reading`](super::validate_meter_reading)'s job.
//!
//! Amounts are rounded to whole Rupiah, half away from zero, on exact
//! decimal values.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::policy::BillingPolicy;
use crate::domain::tariff::TariffRate;
use crate::domain::usage::UsageReading;

/// Whole Rupiah
pub type Rupiah = i64;

/// Itemized result of one calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillBreakdown {
    pub usage_kwh: Decimal,
    pub energy_cost: Rupiah,
    pub admin_fee: Rupiah,
    /// Only present when a positive penalty applies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub late_penalty: Option<Rupiah>,
    pub total_due: Rupiah,
}

impl BillBreakdown {
    pub(crate) fn new(
        usage_kwh: Decimal,
        energy_cost: Rupiah,
        admin_fee: Rupiah,
        late_penalty: Rupiah,
    ) -> Self {
        let late_penalty = (late_penalty > 0).then_some(late_penalty);
        let total_due = energy_cost
            .saturating_add(admin_fee)
            .saturating_add(late_penalty.unwrap_or(0));

        Self {
            usage_kwh,
            energy_cost,
            admin_fee,
            late_penalty,
            total_due,
        }
    }

    /// Energy cost plus admin fee, the base the penalty is charged on
    pub fn subtotal(&self) -> Rupiah {
        self.energy_cost.saturating_add(self.admin_fee)
    }

    /// Same bill with `penalty` replacing any previous penalty.
    pub fn with_late_penalty(&self, penalty: Rupiah) -> Self {
        Self::new(self.usage_kwh, self.energy_cost, self.admin_fee, penalty)
    }
}

/// `max(0, meter_end - meter_start)`
pub fn compute_usage_kwh(reading: &UsageReading) -> Decimal {
    match reading.meter_end.checked_sub(reading.meter_start) {
        Some(delta) => delta.max(Decimal::ZERO),
        None if reading.meter_end > reading.meter_start => Decimal::MAX,
        None => Decimal::ZERO,
    }
}

/// Flat admin fee for a power tier under the standard schedule
pub fn compute_admin_fee(power_tier: i32) -> Rupiah {
    BillingPolicy::standard().admin_fee(power_tier)
}

/// 2% of `subtotal` per late month, not compounded
pub fn compute_late_penalty(subtotal: Rupiah, months_late: i32) -> Rupiah {
    BillingPolicy::standard().late_penalty(subtotal, months_late)
}

/// Full breakdown under the standard schedule
pub fn calculate_bill(reading: &UsageReading, tariff: &TariffRate, months_late: i32) -> BillBreakdown {
    BillingPolicy::standard().calculate(reading, tariff, months_late)
}

pub(crate) fn energy_cost(usage_kwh: Decimal, rate_per_kwh: Decimal) -> Rupiah {
    round_rupiah(saturating_mul(usage_kwh, rate_per_kwh))
}

pub(crate) fn late_penalty_at_rate(subtotal: Rupiah, months_late: i32, rate: Decimal) -> Rupiah {
    if months_late <= 0 {
        return 0;
    }
    let per_month = saturating_mul(Decimal::from(subtotal), rate);
    round_rupiah(saturating_mul(per_month, Decimal::from(months_late)))
}

pub(crate) fn round_rupiah(value: Decimal) -> Rupiah {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    rounded.to_i64().unwrap_or(if rounded.is_sign_negative() {
        Rupiah::MIN
    } else {
        Rupiah::MAX
    })
}

fn saturating_mul(a: Decimal, b: Decimal) -> Decimal {
    a.checked_mul(b).unwrap_or_else(|| {
        if a.is_sign_negative() != b.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        }
    })
}
