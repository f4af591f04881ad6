//! Meter usage recording

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::application::dto::{RecordUsageRequest, UpdateUsageRequest};
use crate::domain::{
    BillingPeriod, BillingPolicy, DomainError, DomainResult, RepositoryProvider, UsageReading,
    UsageRecord,
};
use crate::shared::validations::validate_request;

pub struct UsageService {
    repos: Arc<dyn RepositoryProvider>,
    policy: BillingPolicy,
}

impl UsageService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, policy: BillingPolicy) -> Self {
        Self { repos, policy }
    }

    pub async fn record_usage(&self, request: RecordUsageRequest) -> DomainResult<UsageRecord> {
        validate_request(&request)?;
        let period = BillingPeriod::new(request.month, request.year)?;
        self.check_reading(request.customer_id, request.meter_start, request.meter_end)?;

        self.repos
            .customers()
            .find_by_id(request.customer_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Customer", "id", request.customer_id))?;

        if let Some(existing) = self
            .repos
            .usages()
            .find_for_customer_period(request.customer_id, period)
            .await?
        {
            return Err(DomainError::Conflict(format!(
                "usage {} already recorded for customer {} in {}",
                existing.id, request.customer_id, period
            )));
        }

        let reading = UsageReading::new(request.meter_start, request.meter_end, period);
        let usage = self
            .repos
            .usages()
            .save(UsageRecord::new(request.customer_id, reading))
            .await?;

        info!(
            usage_id = usage.id,
            customer_id = usage.customer_id,
            period = %period,
            meter_start = %usage.reading.meter_start,
            meter_end = %usage.reading.meter_end,
            "Usage recorded"
        );
        Ok(usage)
    }

    /// Corrects the readings of a usage that has not been billed yet.
    pub async fn update_usage(
        &self,
        id: i32,
        request: UpdateUsageRequest,
    ) -> DomainResult<UsageRecord> {
        let mut usage = self
            .repos
            .usages()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Usage", "id", id))?;

        if let Some(bill) = self.repos.bills().find_by_usage(id).await? {
            return Err(DomainError::Conflict(format!(
                "usage {} is already billed by bill {}",
                id, bill.id
            )));
        }

        if let Some(start) = request.meter_start {
            usage.reading.meter_start = start;
        }
        if let Some(end) = request.meter_end {
            usage.reading.meter_end = end;
        }
        self.check_reading(usage.customer_id, usage.reading.meter_start, usage.reading.meter_end)?;

        self.repos.usages().update(usage.clone()).await?;
        info!(usage_id = id, "Usage updated");
        Ok(usage)
    }

    /// Removes a usage that has not been billed yet.
    pub async fn delete_usage(&self, id: i32) -> DomainResult<()> {
        self.repos
            .usages()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Usage", "id", id))?;

        if let Some(bill) = self.repos.bills().find_by_usage(id).await? {
            return Err(DomainError::Conflict(format!(
                "usage {} is already billed by bill {}",
                id, bill.id
            )));
        }

        self.repos.usages().delete(id).await?;
        info!(usage_id = id, "Usage deleted");
        Ok(())
    }

    pub async fn usage_for_customer(&self, customer_id: i32) -> DomainResult<Vec<UsageRecord>> {
        self.repos.usages().find_for_customer(customer_id).await
    }

    pub async fn usage_for_period(&self, period: BillingPeriod) -> DomainResult<Vec<UsageRecord>> {
        self.repos.usages().find_by_period(period).await
    }

    fn check_reading(&self, customer_id: i32, start: Decimal, end: Decimal) -> DomainResult<()> {
        self.policy
            .validate_reading(start, end)
            .into_result()
            .map_err(|rejection| {
                warn!(
                    customer_id,
                    meter_start = %start,
                    meter_end = %end,
                    reason = %rejection,
                    "Meter reading rejected"
                );
                metrics::counter!("planner_meter_readings_rejected_total").increment(1);
                DomainError::Validation(rejection.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::testing::{fixture, usage_request};
    use crate::application::services::BillingService;
    use rust_decimal_macros::dec;

    fn service(repos: Arc<dyn RepositoryProvider>) -> UsageService {
        UsageService::new(repos, BillingPolicy::default())
    }

    #[tokio::test]
    async fn records_usage() {
        let fx = fixture().await;
        let service = service(fx.repos.clone());

        let usage = service
            .record_usage(usage_request(fx.customer.id, 3, 2024, dec!(1000), dec!(1100)))
            .await
            .unwrap();
        assert_eq!(usage.period(), BillingPeriod::new(3, 2024).unwrap());

        let listed = service
            .usage_for_period(BillingPeriod::new(3, 2024).unwrap())
            .await
            .unwrap();
        assert_eq!(listed, vec![usage]);
    }

    #[tokio::test]
    async fn rejects_backwards_reading() {
        let fx = fixture().await;
        let service = service(fx.repos.clone());

        let err = service
            .record_usage(usage_request(fx.customer.id, 3, 2024, dec!(1200), dec!(1100)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(ref m) if m == "meter_end < meter_start"));
    }

    #[tokio::test]
    async fn rejects_anomalous_usage() {
        let fx = fixture().await;
        let service = service(fx.repos.clone());

        let err = service
            .record_usage(usage_request(fx.customer.id, 3, 2024, dec!(0), dec!(2500)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn rejects_second_record_for_period() {
        let fx = fixture().await;
        let service = service(fx.repos.clone());

        service
            .record_usage(usage_request(fx.customer.id, 3, 2024, dec!(1000), dec!(1100)))
            .await
            .unwrap();
        let err = service
            .record_usage(usage_request(fx.customer.id, 3, 2024, dec!(1100), dec!(1150)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn requires_known_customer() {
        let fx = fixture().await;
        let service = service(fx.repos.clone());

        let err = service
            .record_usage(usage_request(99, 3, 2024, dec!(1000), dec!(1100)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Customer", .. }));
    }

    #[tokio::test]
    async fn update_revalidates_merged_reading() {
        let fx = fixture().await;
        let service = service(fx.repos.clone());
        let usage = service
            .record_usage(usage_request(fx.customer.id, 3, 2024, dec!(1000), dec!(1100)))
            .await
            .unwrap();

        let updated = service
            .update_usage(
                usage.id,
                UpdateUsageRequest {
                    meter_end: Some(dec!(1180)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.reading.meter_start, dec!(1000));
        assert_eq!(updated.reading.meter_end, dec!(1180));

        let err = service
            .update_usage(
                usage.id,
                UpdateUsageRequest {
                    meter_start: Some(dec!(1200)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_frees_period_until_billed() {
        let fx = fixture().await;
        let service = service(fx.repos.clone());
        let march = BillingPeriod::new(3, 2024).unwrap();

        let usage = service
            .record_usage(usage_request(fx.customer.id, 3, 2024, dec!(1000), dec!(1100)))
            .await
            .unwrap();
        service.delete_usage(usage.id).await.unwrap();
        assert!(service.usage_for_customer(fx.customer.id).await.unwrap().is_empty());

        let usage = service
            .record_usage(usage_request(fx.customer.id, 3, 2024, dec!(1000), dec!(1120)))
            .await
            .unwrap();
        BillingService::new(fx.repos.clone(), BillingPolicy::default())
            .generate_bills(march)
            .await
            .unwrap();

        let err = service.delete_usage(usage.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        let err = service.delete_usage(404).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Usage", .. }));
    }
}
