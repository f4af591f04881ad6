//! Bill settlement

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Utc};
use tracing::info;

use crate::application::dto::UpdatePaymentRequest;
use crate::domain::billing::{format_rupiah, months_late};
use crate::domain::{
    Bill, BillBreakdown, BillStatus, BillingPolicy, DomainError, DomainResult, Payment,
    PaymentSummary, RepositoryProvider,
};

pub struct PaymentService {
    repos: Arc<dyn RepositoryProvider>,
    policy: BillingPolicy,
}

impl PaymentService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, policy: BillingPolicy) -> Self {
        Self { repos, policy }
    }

    /// Settles an unpaid bill as of `paid_on`.
    ///
    /// The late penalty is charged on the bill's subtotal for every started
    /// month past the due date. The bill is stored with the final breakdown.
    pub async fn pay_bill(&self, bill_id: i32, paid_on: NaiveDate) -> DomainResult<Payment> {
        let mut bill = self
            .repos
            .bills()
            .find_by_id(bill_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Bill", "id", bill_id))?;

        if bill.is_paid() || self.repos.payments().find_by_bill(bill_id).await?.is_some() {
            return Err(DomainError::Conflict(format!("bill {} is already paid", bill_id)));
        }

        let (settled, months) = self.settle(&bill, paid_on);
        let payment = Payment {
            id: 0,
            bill_id,
            customer_id: bill.customer_id,
            paid_on,
            months_late: months,
            admin_fee: settled.admin_fee,
            late_penalty: settled.late_penalty.unwrap_or(0),
            total_paid: settled.total_due,
            recorded_at: Utc::now(),
        };
        let payment = self.repos.payments().save(payment).await?;

        bill.breakdown = settled;
        bill.status = BillStatus::Paid;
        self.repos.bills().update(bill).await?;

        metrics::counter!("planner_payments_recorded_total").increment(1);
        info!(
            payment_id = payment.id,
            bill_id,
            customer_id = payment.customer_id,
            months_late = months,
            total_paid = %format_rupiah(payment.total_paid),
            "Payment recorded"
        );

        Ok(payment)
    }

    /// Changes the payment date and recomputes lateness and amounts.
    pub async fn update_payment(
        &self,
        payment_id: i32,
        request: UpdatePaymentRequest,
    ) -> DomainResult<Payment> {
        let mut payment = self.get_payment(payment_id).await?;
        let Some(paid_on) = request.paid_on else {
            return Ok(payment);
        };
        let mut bill = self.bill_of(&payment).await?;

        let (settled, months) = self.settle(&bill, paid_on);
        payment.paid_on = paid_on;
        payment.months_late = months;
        payment.admin_fee = settled.admin_fee;
        payment.late_penalty = settled.late_penalty.unwrap_or(0);
        payment.total_paid = settled.total_due;
        self.repos.payments().update(payment.clone()).await?;

        bill.breakdown = settled;
        self.repos.bills().update(bill).await?;

        info!(
            payment_id,
            paid_on = %paid_on,
            months_late = months,
            total_paid = %format_rupiah(payment.total_paid),
            "Payment updated"
        );
        Ok(payment)
    }

    /// Removes a payment and reopens its bill without the settled penalty.
    pub async fn cancel_payment(&self, payment_id: i32) -> DomainResult<Bill> {
        let payment = self.get_payment(payment_id).await?;
        let mut bill = self.bill_of(&payment).await?;

        self.repos.payments().delete(payment_id).await?;

        bill.status = BillStatus::Unpaid;
        bill.breakdown = bill.breakdown.with_late_penalty(0);
        self.repos.bills().update(bill.clone()).await?;

        metrics::counter!("planner_payments_cancelled_total").increment(1);
        info!(payment_id, bill_id = bill.id, "Payment cancelled, bill reopened");
        Ok(bill)
    }

    pub async fn get_payment(&self, payment_id: i32) -> DomainResult<Payment> {
        self.repos
            .payments()
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Payment", "id", payment_id))
    }

    pub async fn payments_for_customer(&self, customer_id: i32) -> DomainResult<Vec<Payment>> {
        self.repos.payments().find_for_customer(customer_id).await
    }

    /// Totals over all payments made in `year`
    pub async fn summarize_payments(&self, year: i32) -> DomainResult<PaymentSummary> {
        let payments = self.repos.payments().find_all().await?;
        Ok(PaymentSummary::from_payments(
            payments.iter().filter(|p| p.paid_on.year() == year),
        ))
    }

    async fn bill_of(&self, payment: &Payment) -> DomainResult<Bill> {
        self.repos
            .bills()
            .find_by_id(payment.bill_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Bill", "id", payment.bill_id))
    }

    /// Breakdown owed on `paid_on`. Any earlier penalty is replaced.
    fn settle(&self, bill: &Bill, paid_on: NaiveDate) -> (BillBreakdown, i32) {
        let months = months_late(bill.due_date, paid_on);
        let penalty = self.policy.late_penalty(bill.breakdown.subtotal(), months);
        (bill.breakdown.with_late_penalty(penalty), months)
    }
}
