//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::bill::BillRepository;
use super::customer::CustomerRepository;
use super::payment::PaymentRepository;
use super::tariff::TariffRepository;
use super::usage::UsageRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// Services hold an `Arc<dyn RepositoryProvider>` and ask for the
/// repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let usage = repos.usages().find_by_id(7).await?;
///     let bill = repos.bills().find_by_usage(7).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn tariffs(&self) -> &dyn TariffRepository;
    fn customers(&self) -> &dyn CustomerRepository;
    fn usages(&self) -> &dyn UsageRepository;
    fn bills(&self) -> &dyn BillRepository;
    fn payments(&self) -> &dyn PaymentRepository;
}
