//! Payment domain entity

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::billing::Rupiah;

/// Settlement of one bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: i32,
    pub bill_id: i32,
    pub customer_id: i32,
    pub paid_on: NaiveDate,
    pub months_late: i32,
    pub admin_fee: Rupiah,
    pub late_penalty: Rupiah,
    pub total_paid: Rupiah,
    pub recorded_at: DateTime<Utc>,
}

/// Totals over a set of payments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaymentSummary {
    pub count: usize,
    pub total_admin_fee: Rupiah,
    pub total_late_penalty: Rupiah,
    pub total_paid: Rupiah,
}

impl PaymentSummary {
    pub fn from_payments<'a>(payments: impl IntoIterator<Item = &'a Payment>) -> Self {
        payments.into_iter().fold(Self::default(), |mut acc, p| {
            acc.count += 1;
            acc.total_admin_fee = acc.total_admin_fee.saturating_add(p.admin_fee);
            acc.total_late_penalty = acc.total_late_penalty.saturating_add(p.late_penalty);
            acc.total_paid = acc.total_paid.saturating_add(p.total_paid);
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment(admin_fee: Rupiah, late_penalty: Rupiah, total_paid: Rupiah) -> Payment {
        Payment {
            id: 1,
            bill_id: 1,
            customer_id: 1,
            paid_on: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            months_late: 0,
            admin_fee,
            late_penalty,
            total_paid,
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn summary_adds_up() {
        let payments = vec![payment(2500, 0, 137_700), payment(3500, 1000, 54_500)];
        let summary = PaymentSummary::from_payments(&payments);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total_admin_fee, 6000);
        assert_eq!(summary.total_late_penalty, 1000);
        assert_eq!(summary.total_paid, 192_200);
    }

    #[test]
    fn empty_summary() {
        assert_eq!(PaymentSummary::from_payments(&[]), PaymentSummary::default());
    }
}
