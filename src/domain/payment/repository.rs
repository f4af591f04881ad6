//! Payment repository interface

use async_trait::async_trait;

use super::model::Payment;
use crate::domain::DomainResult;

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Payment>>;
    async fn find_by_bill(&self, bill_id: i32) -> DomainResult<Option<Payment>>;
    async fn find_for_customer(&self, customer_id: i32) -> DomainResult<Vec<Payment>>;
    async fn find_all(&self) -> DomainResult<Vec<Payment>>;
    /// Stores a new payment. `Conflict` if the bill already has one; the
    /// check and the insert are a single step.
    async fn save(&self, payment: Payment) -> DomainResult<Payment>;
    /// Replaces date and amounts. The bill a payment settles never changes.
    async fn update(&self, payment: Payment) -> DomainResult<()>;
    async fn delete(&self, id: i32) -> DomainResult<()>;
}
