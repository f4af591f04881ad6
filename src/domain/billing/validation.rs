//! Advisory meter-reading checks
//!
//! Kept apart from the calculator: `calculate_bill` never calls these, the
//! caller decides whether to run them first and abort on rejection.

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use thiserror::Error;

use super::policy::BillingPolicy;

/// Why a reading pair was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeterRejection {
    #[error("meter readings must not be negative")]
    NegativeReading,

    #[error("meter_end < meter_start")]
    EndBeforeStart,

    /// Heuristic ceiling, not a physical limit
    #[error("usage of {usage} kWh exceeds the {ceiling} kWh anomaly ceiling")]
    AnomalousUsage { usage: Decimal, ceiling: Decimal },
}

impl Serialize for MeterRejection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome of [`validate_meter_reading`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeterValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<MeterRejection>,
}

impl MeterValidation {
    fn accepted() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    fn rejected(reason: MeterRejection) -> Self {
        Self {
            valid: false,
            reason: Some(reason),
        }
    }

    pub fn into_result(self) -> Result<(), MeterRejection> {
        match self.reason {
            Some(reason) => Err(reason),
            None => Ok(()),
        }
    }
}

/// Check a reading pair against the standard 2000 kWh ceiling.
pub fn validate_meter_reading(meter_start: Decimal, meter_end: Decimal) -> MeterValidation {
    BillingPolicy::standard().validate_reading(meter_start, meter_end)
}

pub(crate) fn check_reading(
    meter_start: Decimal,
    meter_end: Decimal,
    ceiling: Decimal,
) -> MeterValidation {
    if meter_start < Decimal::ZERO || meter_end < Decimal::ZERO {
        return MeterValidation::rejected(MeterRejection::NegativeReading);
    }

    if meter_end < meter_start {
        return MeterValidation::rejected(MeterRejection::EndBeforeStart);
    }

    // both sides are non-negative here, so the delta cannot overflow
    let usage = meter_end - meter_start;
    if usage > ceiling {
        return MeterValidation::rejected(MeterRejection::AnomalousUsage { usage, ceiling });
    }

    MeterValidation::accepted()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn accepts_normal_reading() {
        let v = validate_meter_reading(dec!(1000), dec!(1100));
        assert!(v.valid);
        assert_eq!(v.reason, None);
        assert!(v.into_result().is_ok());
    }

    #[test]
    fn accepts_zero_usage_and_ceiling() {
        assert!(validate_meter_reading(dec!(0), dec!(0)).valid);
        assert!(validate_meter_reading(dec!(100), dec!(2100)).valid);
    }

    #[test]
    fn rejects_negative_readings() {
        let v = validate_meter_reading(dec!(-1), dec!(10));
        assert_eq!(v.reason, Some(MeterRejection::NegativeReading));
        let v = validate_meter_reading(dec!(10), dec!(-1));
        assert_eq!(v.reason, Some(MeterRejection::NegativeReading));
    }

    #[test]
    fn negative_zero_is_not_negative() {
        assert!(validate_meter_reading(-Decimal::ZERO, dec!(5)).valid);
    }

    #[test]
    fn rejects_inverted_reading() {
        let v = validate_meter_reading(dec!(1200), dec!(1100));
        assert!(!v.valid);
        assert_eq!(v.reason, Some(MeterRejection::EndBeforeStart));
        assert_eq!(
            v.reason.as_ref().map(ToString::to_string).as_deref(),
            Some("meter_end < meter_start")
        );
    }

    #[test]
    fn rejects_anomalous_usage() {
        let v = validate_meter_reading(dec!(100), dec!(2100.5));
        assert!(!v.valid);
        assert_eq!(
            v.into_result(),
            Err(MeterRejection::AnomalousUsage {
                usage: dec!(2000.5),
                ceiling: dec!(2000),
            })
        );
    }

    #[test]
    fn policy_ceiling_is_configurable() {
        let policy = BillingPolicy {
            usage_ceiling_kwh: dec!(500),
            ..BillingPolicy::default()
        };
        assert!(!policy.validate_reading(dec!(0), dec!(501)).valid);
        assert!(policy.validate_reading(dec!(0), dec!(500)).valid);
    }

    #[test]
    fn serializes_reason_as_text() {
        let v = validate_meter_reading(dec!(1200), dec!(1100));
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["valid"], false);
        assert_eq!(json["reason"], "meter_end < meter_start");

        let ok = serde_json::to_value(validate_meter_reading(dec!(1), dec!(2))).unwrap();
        assert!(ok.get("reason").is_none());
    }
}
