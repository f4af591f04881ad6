//! Billing calculator
//!
//! Turns a meter reading pair and a tariff into an itemized bill:
//!
//! ```text
//! usage_kwh   = max(0, meter_end - meter_start)
//! energy_cost = round(usage_kwh * rate_per_kwh)
//! admin_fee   = step(power_tier)            2500 / 3500 / 4000 / 5000
//! subtotal    = energy_cost + admin_fee
//! late_penalty = round(subtotal * 2% * months_late)
//! total_due   = subtotal + late_penalty
//! ```
//!
//! Reading validation lives next to, not inside, the calculation.

pub mod calculator;
pub mod format;
pub mod lateness;
pub mod policy;
pub mod validation;

pub use calculator::{
    calculate_bill, compute_admin_fee, compute_late_penalty, compute_usage_kwh, BillBreakdown,
    Rupiah,
};
pub use format::{format_breakdown, format_kwh, format_power, format_rupiah};
pub use lateness::months_late;
pub use policy::{AdminFeeTier, BillingPolicy};
pub use validation::{validate_meter_reading, MeterRejection, MeterValidation};
