//! Customer repository interface

use async_trait::async_trait;

use super::model::Customer;
use crate::domain::DomainResult;

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Customer>>;
    async fn find_by_meter_number(&self, meter_number: &str) -> DomainResult<Option<Customer>>;
    async fn find_by_tariff(&self, tariff_id: i32) -> DomainResult<Vec<Customer>>;
    async fn find_all(&self) -> DomainResult<Vec<Customer>>;
    async fn save(&self, customer: Customer) -> DomainResult<Customer>;
    async fn update(&self, customer: Customer) -> DomainResult<()>;
    async fn delete(&self, id: i32) -> DomainResult<()>;
}
