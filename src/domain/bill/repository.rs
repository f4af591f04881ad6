//! Bill repository interface

use async_trait::async_trait;

use super::model::Bill;
use crate::domain::period::BillingPeriod;
use crate::domain::DomainResult;

#[async_trait]
pub trait BillRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Bill>>;
    async fn find_by_usage(&self, usage_id: i32) -> DomainResult<Option<Bill>>;
    async fn find_by_period(&self, period: BillingPeriod) -> DomainResult<Vec<Bill>>;
    async fn find_for_customer(&self, customer_id: i32) -> DomainResult<Vec<Bill>>;
    async fn find_unpaid_for_customer(&self, customer_id: i32) -> DomainResult<Vec<Bill>>;
    async fn find_all(&self) -> DomainResult<Vec<Bill>>;
    /// Stores a new bill. `Conflict` if the usage is already billed; the
    /// check and the insert are a single step.
    async fn save(&self, bill: Bill) -> DomainResult<Bill>;
    /// Replaces status and breakdown. The usage a bill covers never changes.
    async fn update(&self, bill: Bill) -> DomainResult<()>;
}
