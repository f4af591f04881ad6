//! Billing service for generating and assessing electricity bills

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::domain::billing::months_late;
use crate::domain::{
    Bill, BillBreakdown, BillStatus, BillingPeriod, BillingPolicy, DomainError, DomainResult,
    RepositoryProvider, UsageReading,
};

/// Service for billing operations
pub struct BillingService {
    repos: Arc<dyn RepositoryProvider>,
    policy: BillingPolicy,
}

impl BillingService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, policy: BillingPolicy) -> Self {
        Self { repos, policy }
    }

    pub fn policy(&self) -> &BillingPolicy {
        &self.policy
    }

    /// Breakdown for a reading without storing anything
    pub async fn preview_bill(
        &self,
        reading: &UsageReading,
        tariff_id: i32,
        months_late: i32,
    ) -> DomainResult<BillBreakdown> {
        let tariff = self
            .repos
            .tariffs()
            .find_by_id(tariff_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Tariff", "id", tariff_id))?;

        Ok(self.policy.calculate(reading, &tariff, months_late))
    }

    /// Creates one unpaid bill for every usage of `period` that has none yet.
    ///
    /// Customers and tariffs are resolved for the whole batch first, so a
    /// missing reference fails the call before any bill is stored.
    pub async fn generate_bills(&self, period: BillingPeriod) -> DomainResult<Vec<Bill>> {
        let due_date = self.policy.due_date(period).ok_or_else(|| {
            DomainError::Validation(format!("no due date for period {}", period))
        })?;

        let usages = self.repos.usages().find_by_period(period).await?;
        let mut pending = Vec::with_capacity(usages.len());

        for usage in usages {
            if self.repos.bills().find_by_usage(usage.id).await?.is_some() {
                debug!(usage_id = usage.id, "Usage already billed, skipping");
                continue;
            }

            let customer = self
                .repos
                .customers()
                .find_by_id(usage.customer_id)
                .await?
                .ok_or_else(|| DomainError::not_found("Customer", "id", usage.customer_id))?;
            let tariff = self
                .repos
                .tariffs()
                .find_by_id(customer.tariff_id)
                .await?
                .ok_or_else(|| DomainError::not_found("Tariff", "id", customer.tariff_id))?;

            let breakdown = self.policy.calculate(&usage.reading, &tariff, 0);
            pending.push(Bill::new(usage.id, customer.id, period, breakdown, due_date));
        }

        let mut bills = Vec::with_capacity(pending.len());
        for bill in pending {
            let usage_id = bill.usage_id;
            match self.repos.bills().save(bill).await {
                Ok(bill) => bills.push(bill),
                Err(DomainError::Conflict(_)) => {
                    debug!(usage_id, "Usage billed concurrently, skipping");
                }
                Err(e) => return Err(e),
            }
        }

        metrics::counter!("planner_bills_generated_total").increment(bills.len() as u64);
        info!(
            period = %period,
            count = bills.len(),
            due_date = %due_date,
            "Bills generated"
        );

        Ok(bills)
    }

    /// Amount owed on `on`, penalty included.
    ///
    /// Paid bills keep the breakdown they were settled with.
    pub async fn assess_bill(&self, bill_id: i32, on: NaiveDate) -> DomainResult<BillBreakdown> {
        let bill = self.get_bill(bill_id).await?;
        if bill.is_paid() {
            return Ok(bill.breakdown);
        }

        let months = months_late(bill.due_date, on);
        let penalty = self.policy.late_penalty(bill.breakdown.subtotal(), months);
        Ok(bill.breakdown.with_late_penalty(penalty))
    }

    /// Sets the status of a bill. The status has to agree with the payment
    /// records: cancel the payment to reopen a bill, pay it to close it.
    pub async fn update_bill_status(&self, bill_id: i32, status: BillStatus) -> DomainResult<Bill> {
        let mut bill = self.get_bill(bill_id).await?;
        if bill.status == status {
            return Ok(bill);
        }

        let payment = self.repos.payments().find_by_bill(bill_id).await?;
        match (status, payment) {
            (BillStatus::Unpaid, Some(payment)) => {
                return Err(DomainError::Conflict(format!(
                    "bill {} is settled by payment {}",
                    bill_id, payment.id
                )));
            }
            (BillStatus::Paid, None) => {
                return Err(DomainError::Conflict(format!(
                    "bill {} has no payment",
                    bill_id
                )));
            }
            _ => {}
        }

        bill.status = status;
        self.repos.bills().update(bill.clone()).await?;

        info!(bill_id, status = %status, "Bill status updated");
        Ok(bill)
    }

    pub async fn get_bill(&self, bill_id: i32) -> DomainResult<Bill> {
        self.repos
            .bills()
            .find_by_id(bill_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Bill", "id", bill_id))
    }

    pub async fn bills_for_period(&self, period: BillingPeriod) -> DomainResult<Vec<Bill>> {
        self.repos.bills().find_by_period(period).await
    }

    pub async fn unpaid_bills_for_customer(&self, customer_id: i32) -> DomainResult<Vec<Bill>> {
        self.repos.bills().find_unpaid_for_customer(customer_id).await
    }
}
