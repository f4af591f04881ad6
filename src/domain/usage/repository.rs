//! Usage repository interface

use async_trait::async_trait;

use super::model::UsageRecord;
use crate::domain::period::BillingPeriod;
use crate::domain::DomainResult;

#[async_trait]
pub trait UsageRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<UsageRecord>>;
    async fn find_by_period(&self, period: BillingPeriod) -> DomainResult<Vec<UsageRecord>>;
    async fn find_for_customer(&self, customer_id: i32) -> DomainResult<Vec<UsageRecord>>;
    async fn find_for_customer_period(
        &self,
        customer_id: i32,
        period: BillingPeriod,
    ) -> DomainResult<Option<UsageRecord>>;
    async fn find_all(&self) -> DomainResult<Vec<UsageRecord>>;
    /// Stores a new usage. `Conflict` if the customer already has one for
    /// the period; the check and the insert are a single step.
    async fn save(&self, usage: UsageRecord) -> DomainResult<UsageRecord>;
    /// Replaces the readings. Customer and period are fixed once stored.
    async fn update(&self, usage: UsageRecord) -> DomainResult<()>;
    async fn delete(&self, id: i32) -> DomainResult<()>;
}
