//! In-memory repository implementations

use std::hash::Hash;
use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

use crate::domain::bill::{Bill, BillRepository, BillStatus};
use crate::domain::customer::{Customer, CustomerRepository};
use crate::domain::payment::{Payment, PaymentRepository};
use crate::domain::period::BillingPeriod;
use crate::domain::tariff::{TariffRate, TariffRepository};
use crate::domain::usage::{UsageRecord, UsageRepository};
use crate::domain::{DomainError, DomainResult};

/// Monotonic id source, first id is 1
struct IdSequence(AtomicI32);

impl IdSequence {
    fn new() -> Self {
        Self(AtomicI32::new(1))
    }

    fn next(&self) -> i32 {
        self.0.fetch_add(1, Ordering::SeqCst)
    }
}

/// Secondary index mapping a unique key to the id of the record holding it
struct UniqueIndex<K: Eq + Hash>(DashMap<K, i32>);

impl<K: Eq + Hash> UniqueIndex<K> {
    fn new() -> Self {
        Self(DashMap::new())
    }

    /// Runs `insert` and records its id if `key` is free; otherwise returns
    /// the id already holding the key. The shard lock for `key` is held
    /// throughout, so two claims on one key cannot both succeed.
    fn claim(&self, key: K, insert: impl FnOnce() -> i32) -> Result<i32, i32> {
        match self.0.entry(key) {
            Entry::Occupied(holder) => Err(*holder.get()),
            Entry::Vacant(slot) => {
                let id = insert();
                slot.insert(id);
                Ok(id)
            }
        }
    }

    fn release(&self, key: &K) {
        self.0.remove(key);
    }
}

/// Results sorted by id so listings are stable
fn sorted_by_id<T>(mut items: Vec<T>, id: impl Fn(&T) -> i32) -> Vec<T> {
    items.sort_by_key(|item| id(item));
    items
}

// ── Tariffs ─────────────────────────────────────────────────────

pub struct InMemoryTariffRepository {
    tariffs: DashMap<i32, TariffRate>,
    ids: IdSequence,
}

impl InMemoryTariffRepository {
    pub fn new() -> Self {
        Self {
            tariffs: DashMap::new(),
            ids: IdSequence::new(),
        }
    }
}

impl Default for InMemoryTariffRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TariffRepository for InMemoryTariffRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<TariffRate>> {
        Ok(self.tariffs.get(&id).map(|t| t.clone()))
    }

    async fn find_by_power_tier(&self, power_tier: i32) -> DomainResult<Option<TariffRate>> {
        Ok(self
            .tariffs
            .iter()
            .find(|t| t.power_tier == power_tier)
            .map(|t| t.value().clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<TariffRate>> {
        let all = self.tariffs.iter().map(|t| t.value().clone()).collect();
        Ok(sorted_by_id(all, |t| t.id))
    }

    async fn save(&self, mut tariff: TariffRate) -> DomainResult<TariffRate> {
        tariff.id = self.ids.next();
        debug!(id = tariff.id, power_tier = tariff.power_tier, "tariff stored");
        self.tariffs.insert(tariff.id, tariff.clone());
        Ok(tariff)
    }

    async fn update(&self, tariff: TariffRate) -> DomainResult<()> {
        match self.tariffs.get_mut(&tariff.id) {
            Some(mut entry) => {
                *entry = tariff;
                Ok(())
            }
            None => Err(DomainError::not_found("Tariff", "id", tariff.id)),
        }
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        self.tariffs
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("Tariff", "id", id))
    }
}

// ── Customers ───────────────────────────────────────────────────

pub struct InMemoryCustomerRepository {
    customers: DashMap<i32, Customer>,
    ids: IdSequence,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self {
            customers: DashMap::new(),
            ids: IdSequence::new(),
        }
    }
}

impl Default for InMemoryCustomerRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Customer>> {
        Ok(self.customers.get(&id).map(|c| c.clone()))
    }

    async fn find_by_meter_number(&self, meter_number: &str) -> DomainResult<Option<Customer>> {
        Ok(self
            .customers
            .iter()
            .find(|c| c.meter_number == meter_number)
            .map(|c| c.value().clone()))
    }

    async fn find_by_tariff(&self, tariff_id: i32) -> DomainResult<Vec<Customer>> {
        let matching = self
            .customers
            .iter()
            .filter(|c| c.tariff_id == tariff_id)
            .map(|c| c.value().clone())
            .collect();
        Ok(sorted_by_id(matching, |c| c.id))
    }

    async fn find_all(&self) -> DomainResult<Vec<Customer>> {
        let all = self.customers.iter().map(|c| c.value().clone()).collect();
        Ok(sorted_by_id(all, |c| c.id))
    }

    async fn save(&self, mut customer: Customer) -> DomainResult<Customer> {
        customer.id = self.ids.next();
        debug!(id = customer.id, meter_number = %customer.meter_number, "customer stored");
        self.customers.insert(customer.id, customer.clone());
        Ok(customer)
    }

    async fn update(&self, customer: Customer) -> DomainResult<()> {
        match self.customers.get_mut(&customer.id) {
            Some(mut entry) => {
                *entry = customer;
                Ok(())
            }
            None => Err(DomainError::not_found("Customer", "id", customer.id)),
        }
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        self.customers
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("Customer", "id", id))
    }
}

// ── Usage records ───────────────────────────────────────────────

pub struct InMemoryUsageRepository {
    usages: DashMap<i32, UsageRecord>,
    by_customer_period: UniqueIndex<(i32, BillingPeriod)>,
    ids: IdSequence,
}

impl InMemoryUsageRepository {
    pub fn new() -> Self {
        Self {
            usages: DashMap::new(),
            by_customer_period: UniqueIndex::new(),
            ids: IdSequence::new(),
        }
    }
}

impl Default for InMemoryUsageRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UsageRepository for InMemoryUsageRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<UsageRecord>> {
        Ok(self.usages.get(&id).map(|u| u.clone()))
    }

    async fn find_by_period(&self, period: BillingPeriod) -> DomainResult<Vec<UsageRecord>> {
        let matching = self
            .usages
            .iter()
            .filter(|u| u.period() == period)
            .map(|u| u.value().clone())
            .collect();
        Ok(sorted_by_id(matching, |u| u.id))
    }

    async fn find_for_customer(&self, customer_id: i32) -> DomainResult<Vec<UsageRecord>> {
        let matching = self
            .usages
            .iter()
            .filter(|u| u.customer_id == customer_id)
            .map(|u| u.value().clone())
            .collect();
        Ok(sorted_by_id(matching, |u| u.id))
    }

    async fn find_for_customer_period(
        &self,
        customer_id: i32,
        period: BillingPeriod,
    ) -> DomainResult<Option<UsageRecord>> {
        Ok(self
            .usages
            .iter()
            .find(|u| u.customer_id == customer_id && u.period() == period)
            .map(|u| u.value().clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<UsageRecord>> {
        let all = self.usages.iter().map(|u| u.value().clone()).collect();
        Ok(sorted_by_id(all, |u| u.id))
    }

    async fn save(&self, mut usage: UsageRecord) -> DomainResult<UsageRecord> {
        let key = (usage.customer_id, usage.period());
        let claimed = self.by_customer_period.claim(key, || {
            usage.id = self.ids.next();
            self.usages.insert(usage.id, usage.clone());
            usage.id
        });

        match claimed {
            Ok(id) => {
                debug!(id, customer_id = usage.customer_id, "usage stored");
                Ok(usage)
            }
            Err(existing) => Err(DomainError::Conflict(format!(
                "usage {} already recorded for customer {} in {}",
                existing, key.0, key.1
            ))),
        }
    }

    async fn update(&self, usage: UsageRecord) -> DomainResult<()> {
        match self.usages.get_mut(&usage.id) {
            Some(mut entry) => {
                if entry.customer_id != usage.customer_id || entry.period() != usage.period() {
                    return Err(DomainError::Validation(format!(
                        "customer and period of usage {} cannot change",
                        usage.id
                    )));
                }
                *entry = usage;
                Ok(())
            }
            None => Err(DomainError::not_found("Usage", "id", usage.id)),
        }
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let (_, usage) = self
            .usages
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("Usage", "id", id))?;
        self.by_customer_period
            .release(&(usage.customer_id, usage.period()));
        debug!(id, "usage deleted");
        Ok(())
    }
}

// ── Bills ───────────────────────────────────────────────────────

pub struct InMemoryBillRepository {
    bills: DashMap<i32, Bill>,
    by_usage: UniqueIndex<i32>,
    ids: IdSequence,
}

impl InMemoryBillRepository {
    pub fn new() -> Self {
        Self {
            bills: DashMap::new(),
            by_usage: UniqueIndex::new(),
            ids: IdSequence::new(),
        }
    }

    fn collect(&self, keep: impl Fn(&Bill) -> bool) -> Vec<Bill> {
        let matching = self
            .bills
            .iter()
            .filter(|b| keep(b.value()))
            .map(|b| b.value().clone())
            .collect();
        sorted_by_id(matching, |b| b.id)
    }
}

impl Default for InMemoryBillRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BillRepository for InMemoryBillRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Bill>> {
        Ok(self.bills.get(&id).map(|b| b.clone()))
    }

    async fn find_by_usage(&self, usage_id: i32) -> DomainResult<Option<Bill>> {
        Ok(self
            .bills
            .iter()
            .find(|b| b.usage_id == usage_id)
            .map(|b| b.value().clone()))
    }

    async fn find_by_period(&self, period: BillingPeriod) -> DomainResult<Vec<Bill>> {
        Ok(self.collect(|b| b.period == period))
    }

    async fn find_for_customer(&self, customer_id: i32) -> DomainResult<Vec<Bill>> {
        Ok(self.collect(|b| b.customer_id == customer_id))
    }

    async fn find_unpaid_for_customer(&self, customer_id: i32) -> DomainResult<Vec<Bill>> {
        Ok(self.collect(|b| b.customer_id == customer_id && b.status == BillStatus::Unpaid))
    }

    async fn find_all(&self) -> DomainResult<Vec<Bill>> {
        Ok(self.collect(|_| true))
    }

    async fn save(&self, mut bill: Bill) -> DomainResult<Bill> {
        let usage_id = bill.usage_id;
        let claimed = self.by_usage.claim(usage_id, || {
            bill.id = self.ids.next();
            self.bills.insert(bill.id, bill.clone());
            bill.id
        });

        match claimed {
            Ok(id) => {
                debug!(id, usage_id, "bill stored");
                Ok(bill)
            }
            Err(existing) => Err(DomainError::Conflict(format!(
                "usage {} is already billed by bill {}",
                usage_id, existing
            ))),
        }
    }

    async fn update(&self, bill: Bill) -> DomainResult<()> {
        match self.bills.get_mut(&bill.id) {
            Some(mut entry) => {
                if entry.usage_id != bill.usage_id {
                    return Err(DomainError::Validation(format!(
                        "bill {} cannot move to another usage",
                        bill.id
                    )));
                }
                *entry = bill;
                Ok(())
            }
            None => Err(DomainError::not_found("Bill", "id", bill.id)),
        }
    }
}

// ── Payments ────────────────────────────────────────────────────

pub struct InMemoryPaymentRepository {
    payments: DashMap<i32, Payment>,
    by_bill: UniqueIndex<i32>,
    ids: IdSequence,
}

impl InMemoryPaymentRepository {
    pub fn new() -> Self {
        Self {
            payments: DashMap::new(),
            by_bill: UniqueIndex::new(),
            ids: IdSequence::new(),
        }
    }
}

impl Default for InMemoryPaymentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Payment>> {
        Ok(self.payments.get(&id).map(|p| p.clone()))
    }

    async fn find_by_bill(&self, bill_id: i32) -> DomainResult<Option<Payment>> {
        Ok(self
            .payments
            .iter()
            .find(|p| p.bill_id == bill_id)
            .map(|p| p.value().clone()))
    }

    async fn find_for_customer(&self, customer_id: i32) -> DomainResult<Vec<Payment>> {
        let matching = self
            .payments
            .iter()
            .filter(|p| p.customer_id == customer_id)
            .map(|p| p.value().clone())
            .collect();
        Ok(sorted_by_id(matching, |p| p.id))
    }

    async fn find_all(&self) -> DomainResult<Vec<Payment>> {
        let all = self.payments.iter().map(|p| p.value().clone()).collect();
        Ok(sorted_by_id(all, |p| p.id))
    }

    async fn save(&self, mut payment: Payment) -> DomainResult<Payment> {
        let bill_id = payment.bill_id;
        let claimed = self.by_bill.claim(bill_id, || {
            payment.id = self.ids.next();
            self.payments.insert(payment.id, payment.clone());
            payment.id
        });

        match claimed {
            Ok(id) => {
                debug!(id, bill_id, "payment stored");
                Ok(payment)
            }
            Err(_) => Err(DomainError::Conflict(format!(
                "bill {} is already paid",
                bill_id
            ))),
        }
    }

    async fn update(&self, payment: Payment) -> DomainResult<()> {
        match self.payments.get_mut(&payment.id) {
            Some(mut entry) => {
                if entry.bill_id != payment.bill_id {
                    return Err(DomainError::Validation(format!(
                        "payment {} cannot move to another bill",
                        payment.id
                    )));
                }
                *entry = payment;
                Ok(())
            }
            None => Err(DomainError::not_found("Payment", "id", payment.id)),
        }
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let (_, payment) = self
            .payments
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("Payment", "id", id))?;
        self.by_bill.release(&payment.bill_id);
        debug!(id, bill_id = payment.bill_id, "payment deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::billing::BillBreakdown;
    use crate::domain::usage::UsageReading;
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn breakdown() -> BillBreakdown {
        BillBreakdown {
            usage_kwh: Decimal::ZERO,
            energy_cost: 0,
            admin_fee: 2500,
            late_penalty: None,
            total_due: 2500,
        }
    }

    fn payment(bill_id: i32) -> Payment {
        Payment {
            id: 0,
            bill_id,
            customer_id: 7,
            paid_on: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            months_late: 0,
            admin_fee: 2500,
            late_penalty: 0,
            total_paid: 2500,
            recorded_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn tariff_ids_are_sequential() {
        let repo = InMemoryTariffRepository::new();
        let a = repo.save(TariffRate::new(450, dec!(415))).await.unwrap();
        let b = repo.save(TariffRate::new(900, dec!(1352))).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        let found = repo.find_by_power_tier(900).await.unwrap().unwrap();
        assert_eq!(found.id, 2);
        let ids: Vec<i32> = repo.find_all().await.unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn update_and_delete_missing_tariff() {
        let repo = InMemoryTariffRepository::new();
        let mut ghost = TariffRate::new(900, dec!(1352));
        ghost.id = 99;
        assert!(matches!(
            repo.update(ghost).await,
            Err(DomainError::NotFound { entity: "Tariff", .. })
        ));
        assert!(repo.delete(99).await.is_err());
    }

    #[tokio::test]
    async fn unpaid_bills_filter_by_status() {
        let repo = InMemoryBillRepository::new();
        let period = BillingPeriod::new(1, 2024).unwrap();
        let due = NaiveDate::from_ymd_opt(2024, 2, 20).unwrap();

        let first = repo
            .save(Bill::new(1, 7, period, breakdown(), due))
            .await
            .unwrap();
        let mut second = repo
            .save(Bill::new(2, 7, period, breakdown(), due))
            .await
            .unwrap();
        second.status = BillStatus::Paid;
        repo.update(second).await.unwrap();

        let unpaid = repo.find_unpaid_for_customer(7).await.unwrap();
        assert_eq!(unpaid.len(), 1);
        assert_eq!(unpaid[0].id, first.id);
        assert_eq!(repo.find_by_usage(2).await.unwrap().map(|b| b.id), Some(2));
        assert_eq!(repo.find_for_customer(7).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn second_bill_for_usage_conflicts() {
        let repo = InMemoryBillRepository::new();
        let period = BillingPeriod::new(1, 2024).unwrap();
        let due = NaiveDate::from_ymd_opt(2024, 2, 20).unwrap();

        repo.save(Bill::new(1, 7, period, breakdown(), due)).await.unwrap();
        let err = repo
            .save(Bill::new(1, 7, period, breakdown(), due))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn usage_slot_is_freed_on_delete() {
        let repo = InMemoryUsageRepository::new();
        let period = BillingPeriod::new(3, 2024).unwrap();
        let record = || UsageRecord::new(5, UsageReading::new(dec!(0), dec!(10), period));

        let first = repo.save(record()).await.unwrap();
        assert!(matches!(
            repo.save(record()).await,
            Err(DomainError::Conflict(_))
        ));

        repo.delete(first.id).await.unwrap();
        let again = repo.save(record()).await.unwrap();
        assert_ne!(again.id, first.id);
    }

    #[tokio::test]
    async fn usage_update_keeps_customer_and_period() {
        let repo = InMemoryUsageRepository::new();
        let period = BillingPeriod::new(3, 2024).unwrap();
        let mut usage = repo
            .save(UsageRecord::new(5, UsageReading::new(dec!(0), dec!(10), period)))
            .await
            .unwrap();

        usage.reading.period = period.next();
        assert!(matches!(
            repo.update(usage).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn concurrent_payments_for_one_bill_store_one() {
        let repo = Arc::new(InMemoryPaymentRepository::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.save(payment(1)).await })
            })
            .collect();

        let mut stored = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => stored += 1,
                Err(err) => assert!(matches!(err, DomainError::Conflict(_))),
            }
        }
        assert_eq!(stored, 1);
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn deleted_payment_frees_bill() {
        let repo = InMemoryPaymentRepository::new();
        let first = repo.save(payment(3)).await.unwrap();

        repo.delete(first.id).await.unwrap();
        assert!(repo.find_by_bill(3).await.unwrap().is_none());
        assert!(repo.save(payment(3)).await.is_ok());
        assert!(matches!(
            repo.delete(first.id).await,
            Err(DomainError::NotFound { entity: "Payment", .. })
        ));
    }
}
