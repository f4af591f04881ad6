//! Customer registration

use std::sync::Arc;

use tracing::info;

use crate::application::dto::{RegisterCustomerRequest, UpdateCustomerRequest};
use crate::domain::{Customer, DomainError, DomainResult, RepositoryProvider};
use crate::shared::validations::validate_request;

pub struct CustomerService {
    repos: Arc<dyn RepositoryProvider>,
}

impl CustomerService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn register_customer(
        &self,
        request: RegisterCustomerRequest,
    ) -> DomainResult<Customer> {
        validate_request(&request)?;

        let meter_number = request.meter_number.trim().to_string();
        if self
            .repos
            .customers()
            .find_by_meter_number(&meter_number)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(format!("meter number {}", meter_number)));
        }

        self.repos
            .tariffs()
            .find_by_id(request.tariff_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Tariff", "id", request.tariff_id))?;

        let customer = Customer::new(
            request.name.trim(),
            meter_number,
            request.address.trim(),
            request.tariff_id,
        );
        let customer = self.repos.customers().save(customer).await?;

        info!(
            customer_id = customer.id,
            meter_number = %customer.meter_number,
            tariff_id = customer.tariff_id,
            "Customer registered"
        );
        Ok(customer)
    }

    pub async fn get_customer(&self, id: i32) -> DomainResult<Customer> {
        self.repos
            .customers()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Customer", "id", id))
    }

    pub async fn list_customers(&self) -> DomainResult<Vec<Customer>> {
        self.repos.customers().find_all().await
    }

    pub async fn update_customer(
        &self,
        id: i32,
        request: UpdateCustomerRequest,
    ) -> DomainResult<Customer> {
        validate_request(&request)?;
        let mut customer = self.get_customer(id).await?;

        if let Some(meter_number) = request.meter_number {
            let meter_number = meter_number.trim().to_string();
            if meter_number != customer.meter_number {
                if let Some(other) = self
                    .repos
                    .customers()
                    .find_by_meter_number(&meter_number)
                    .await?
                {
                    return Err(DomainError::Conflict(format!(
                        "meter number {} belongs to customer {}",
                        meter_number, other.id
                    )));
                }
            }
            customer.meter_number = meter_number;
        }
        if let Some(tariff_id) = request.tariff_id {
            self.repos
                .tariffs()
                .find_by_id(tariff_id)
                .await?
                .ok_or_else(|| DomainError::not_found("Tariff", "id", tariff_id))?;
            customer.tariff_id = tariff_id;
        }
        if let Some(name) = request.name {
            customer.name = name.trim().to_string();
        }
        if let Some(address) = request.address {
            customer.address = address.trim().to_string();
        }

        self.repos.customers().update(customer.clone()).await?;
        info!(customer_id = id, "Customer updated");
        Ok(customer)
    }

    /// Refuses while usage records or bills still reference the customer.
    pub async fn delete_customer(&self, id: i32) -> DomainResult<()> {
        self.get_customer(id).await?;

        let usages = self.repos.usages().find_for_customer(id).await?;
        let bills = self.repos.bills().find_for_customer(id).await?;
        if !usages.is_empty() || !bills.is_empty() {
            return Err(DomainError::Conflict(format!(
                "customer {} has {} usage record(s) and {} bill(s)",
                id,
                usages.len(),
                bills.len()
            )));
        }

        self.repos.customers().delete(id).await?;
        info!(customer_id = id, "Customer deleted");
        Ok(())
    }
}
