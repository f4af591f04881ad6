//! In-memory implementation of RepositoryProvider

use crate::domain::bill::BillRepository;
use crate::domain::customer::CustomerRepository;
use crate::domain::payment::PaymentRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::tariff::TariffRepository;
use crate::domain::usage::UsageRepository;

use super::memory::{
    InMemoryBillRepository, InMemoryCustomerRepository, InMemoryPaymentRepository,
    InMemoryTariffRepository, InMemoryUsageRepository,
};

/// Repository provider that keeps everything in process memory.
///
/// Used by tests and the CLI; a database-backed provider implements the
/// same trait.
///
/// ```ignore
/// let repos: Arc<dyn RepositoryProvider> = Arc::new(InMemoryRepositoryProvider::new());
/// let tariff = repos.tariffs().find_by_power_tier(900).await?;
/// ```
#[derive(Default)]
pub struct InMemoryRepositoryProvider {
    tariffs: InMemoryTariffRepository,
    customers: InMemoryCustomerRepository,
    usages: InMemoryUsageRepository,
    bills: InMemoryBillRepository,
    payments: InMemoryPaymentRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn tariffs(&self) -> &dyn TariffRepository {
        &self.tariffs
    }

    fn customers(&self) -> &dyn CustomerRepository {
        &self.customers
    }

    fn usages(&self) -> &dyn UsageRepository {
        &self.usages
    }

    fn bills(&self) -> &dyn BillRepository {
        &self.bills
    }

    fn payments(&self) -> &dyn PaymentRepository {
        &self.payments
    }
}
