//! Tariff management

use std::sync::Arc;

use tracing::info;

use crate::application::dto::{CreateTariffRequest, UpdateTariffRequest};
use crate::domain::{DomainError, DomainResult, RepositoryProvider, TariffRate};
use crate::shared::validations::validate_request;

pub struct TariffService {
    repos: Arc<dyn RepositoryProvider>,
}

impl TariffService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn create_tariff(&self, request: CreateTariffRequest) -> DomainResult<TariffRate> {
        validate_request(&request)?;

        if self
            .repos
            .tariffs()
            .find_by_power_tier(request.power_tier)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(format!(
                "tariff for {} VA",
                request.power_tier
            )));
        }

        let tariff = TariffRate::new(request.power_tier, request.rate_per_kwh);
        tariff.validate()?;
        let tariff = self.repos.tariffs().save(tariff).await?;

        info!(
            tariff_id = tariff.id,
            power_tier = tariff.power_tier,
            rate_per_kwh = %tariff.rate_per_kwh,
            "Tariff created"
        );
        Ok(tariff)
    }

    pub async fn update_tariff(
        &self,
        id: i32,
        request: UpdateTariffRequest,
    ) -> DomainResult<TariffRate> {
        let mut tariff = self.get_tariff(id).await?;

        if let Some(power_tier) = request.power_tier {
            if power_tier != tariff.power_tier {
                if let Some(other) = self.repos.tariffs().find_by_power_tier(power_tier).await? {
                    return Err(DomainError::Conflict(format!(
                        "tariff {} already covers {} VA",
                        other.id, power_tier
                    )));
                }
            }
            tariff.power_tier = power_tier;
        }
        if let Some(rate) = request.rate_per_kwh {
            tariff.rate_per_kwh = rate;
        }

        tariff.validate()?;
        self.repos.tariffs().update(tariff.clone()).await?;

        info!(tariff_id = id, "Tariff updated");
        Ok(tariff)
    }

    pub async fn get_tariff(&self, id: i32) -> DomainResult<TariffRate> {
        self.repos
            .tariffs()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Tariff", "id", id))
    }

    pub async fn list_tariffs(&self) -> DomainResult<Vec<TariffRate>> {
        self.repos.tariffs().find_all().await
    }

    /// Refuses while any customer is still on the tariff.
    pub async fn delete_tariff(&self, id: i32) -> DomainResult<()> {
        let customers = self.repos.customers().find_by_tariff(id).await?;
        if !customers.is_empty() {
            return Err(DomainError::Conflict(format!(
                "tariff {} is used by {} customer(s)",
                id,
                customers.len()
            )));
        }

        self.repos.tariffs().delete(id).await?;
        info!(tariff_id = id, "Tariff deleted");
        Ok(())
    }
}
