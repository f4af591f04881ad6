//! Payment request DTOs

use chrono::NaiveDate;
use serde::Deserialize;

/// Correction of a recorded payment.
///
/// Amounts are not accepted: they are recomputed from the bill and the
/// payment date.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePaymentRequest {
    pub paid_on: Option<NaiveDate>,
}
