//! Tariff repository interface

use async_trait::async_trait;

use super::model::TariffRate;
use crate::domain::DomainResult;

#[async_trait]
pub trait TariffRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<TariffRate>>;
    async fn find_by_power_tier(&self, power_tier: i32) -> DomainResult<Option<TariffRate>>;
    async fn find_all(&self) -> DomainResult<Vec<TariffRate>>;
    async fn save(&self, tariff: TariffRate) -> DomainResult<TariffRate>;
    async fn update(&self, tariff: TariffRate) -> DomainResult<()>;
    async fn delete(&self, id: i32) -> DomainResult<()>;
}
