//! Usage, bill and payment reports

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::domain::bill::{Bill, BillStatus};
use crate::domain::billing::{compute_usage_kwh, Rupiah};
use crate::domain::payment::{Payment, PaymentSummary};
use crate::domain::usage::UsageRecord;

/// Usage records to include. `None` matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageFilter {
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub customer_id: Option<i32>,
}

impl UsageFilter {
    pub fn matches(&self, usage: &UsageRecord) -> bool {
        self.month.map_or(true, |m| usage.reading.period.month == m)
            && self.year.map_or(true, |y| usage.reading.period.year == y)
            && self.customer_id.map_or(true, |c| usage.customer_id == c)
    }
}

/// Bills to include. `None` matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BillFilter {
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub status: Option<BillStatus>,
    pub customer_id: Option<i32>,
}

impl BillFilter {
    pub fn matches(&self, bill: &Bill) -> bool {
        self.month.map_or(true, |m| bill.period.month == m)
            && self.year.map_or(true, |y| bill.period.year == y)
            && self.status.map_or(true, |s| bill.status == s)
            && self.customer_id.map_or(true, |c| bill.customer_id == c)
    }
}

/// Payments to include. Date bounds are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaymentFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub customer_id: Option<i32>,
}

impl PaymentFilter {
    pub fn matches(&self, payment: &Payment) -> bool {
        self.from.map_or(true, |d| payment.paid_on >= d)
            && self.to.map_or(true, |d| payment.paid_on <= d)
            && self.customer_id.map_or(true, |c| payment.customer_id == c)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageReport {
    /// Newest period first
    pub records: Vec<UsageRecord>,
    pub total_records: usize,
    pub total_kwh: Decimal,
    /// Mean usage per record, two decimals
    pub average_kwh: Decimal,
}

impl UsageReport {
    pub fn new(mut records: Vec<UsageRecord>) -> Self {
        records.sort_by(|a, b| b.period().cmp(&a.period()).then(a.id.cmp(&b.id)));

        let total_kwh = records.iter().fold(Decimal::ZERO, |acc, usage| {
            acc.checked_add(compute_usage_kwh(&usage.reading))
                .unwrap_or(Decimal::MAX)
        });
        let average_kwh = match records.len() {
            0 => Decimal::ZERO,
            n => (total_kwh / Decimal::from(n))
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        };

        Self {
            total_records: records.len(),
            records,
            total_kwh,
            average_kwh,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillReport {
    /// Newest period first
    pub bills: Vec<Bill>,
    pub total_bills: usize,
    pub total_kwh: Decimal,
    pub total_due: Rupiah,
}

impl BillReport {
    pub fn new(mut bills: Vec<Bill>) -> Self {
        bills.sort_by(|a, b| b.period.cmp(&a.period).then(a.id.cmp(&b.id)));

        let (total_kwh, total_due) =
            bills
                .iter()
                .fold((Decimal::ZERO, 0 as Rupiah), |(kwh, due), bill| {
                    (
                        kwh.checked_add(bill.breakdown.usage_kwh)
                            .unwrap_or(Decimal::MAX),
                        due.saturating_add(bill.breakdown.total_due),
                    )
                });

        Self {
            total_bills: bills.len(),
            bills,
            total_kwh,
            total_due,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentReport {
    /// Most recent payment first
    pub payments: Vec<Payment>,
    pub summary: PaymentSummary,
}

impl PaymentReport {
    pub fn new(mut payments: Vec<Payment>) -> Self {
        payments.sort_by(|a, b| b.paid_on.cmp(&a.paid_on).then(a.id.cmp(&b.id)));
        let summary = PaymentSummary::from_payments(&payments);
        Self { payments, summary }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::period::BillingPeriod;
    use crate::domain::usage::UsageReading;
    use rust_decimal_macros::dec;

    fn usage(id: i32, month: u32, start: Decimal, end: Decimal) -> UsageRecord {
        let period = BillingPeriod::new(month, 2024).unwrap();
        let mut record = UsageRecord::new(1, UsageReading::new(start, end, period));
        record.id = id;
        record
    }

    #[test]
    fn usage_average_rounds_to_cents() {
        let report = UsageReport::new(vec![
            usage(1, 1, dec!(0), dec!(100)),
            usage(2, 3, dec!(100), dec!(150)),
            usage(3, 2, dec!(150), dec!(151)),
        ]);
        assert_eq!(report.total_records, 3);
        assert_eq!(report.total_kwh, dec!(151));
        assert_eq!(report.average_kwh, dec!(50.33));
        let ids: Vec<i32> = report.records.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn empty_usage_report() {
        let report = UsageReport::new(Vec::new());
        assert_eq!(report.total_records, 0);
        assert_eq!(report.total_kwh, Decimal::ZERO);
        assert_eq!(report.average_kwh, Decimal::ZERO);
    }

    #[test]
    fn usage_filter_combines_fields() {
        let record = usage(1, 3, dec!(0), dec!(10));
        assert!(UsageFilter::default().matches(&record));
        assert!(UsageFilter {
            month: Some(3),
            year: Some(2024),
            customer_id: Some(1),
        }
        .matches(&record));
        assert!(!UsageFilter {
            year: Some(2023),
            ..Default::default()
        }
        .matches(&record));
    }
}
