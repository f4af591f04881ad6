//! Read-only reports over usage, bills and payments

use std::sync::Arc;

use tracing::debug;

use crate::domain::{
    BillFilter, BillReport, DomainResult, PaymentFilter, PaymentReport, RepositoryProvider,
    UsageFilter, UsageReport,
};

pub struct ReportService {
    repos: Arc<dyn RepositoryProvider>,
}

impl ReportService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn usage_report(&self, filter: UsageFilter) -> DomainResult<UsageReport> {
        let records = match filter.customer_id {
            Some(customer_id) => self.repos.usages().find_for_customer(customer_id).await?,
            None => self.repos.usages().find_all().await?,
        };
        let report = UsageReport::new(records.into_iter().filter(|u| filter.matches(u)).collect());

        debug!(?filter, total_records = report.total_records, "Usage report built");
        Ok(report)
    }

    pub async fn bill_report(&self, filter: BillFilter) -> DomainResult<BillReport> {
        let bills = match filter.customer_id {
            Some(customer_id) => self.repos.bills().find_for_customer(customer_id).await?,
            None => self.repos.bills().find_all().await?,
        };
        let report = BillReport::new(bills.into_iter().filter(|b| filter.matches(b)).collect());

        debug!(?filter, total_bills = report.total_bills, "Bill report built");
        Ok(report)
    }

    pub async fn payment_report(&self, filter: PaymentFilter) -> DomainResult<PaymentReport> {
        let payments = match filter.customer_id {
            Some(customer_id) => self.repos.payments().find_for_customer(customer_id).await?,
            None => self.repos.payments().find_all().await?,
        };
        let report =
            PaymentReport::new(payments.into_iter().filter(|p| filter.matches(p)).collect());

        debug!(?filter, count = report.summary.count, "Payment report built");
        Ok(report)
    }
}
