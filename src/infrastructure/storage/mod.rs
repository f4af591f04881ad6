//! Storage implementations

mod memory;
mod provider;

pub use memory::{
    InMemoryBillRepository, InMemoryCustomerRepository, InMemoryPaymentRepository,
    InMemoryTariffRepository, InMemoryUsageRepository,
};
pub use provider::InMemoryRepositoryProvider;
