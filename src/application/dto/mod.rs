//! Request payloads accepted by the application services

pub mod customer;
pub mod payment;
pub mod tariff;
pub mod usage;

pub use customer::{RegisterCustomerRequest, UpdateCustomerRequest};
pub use payment::UpdatePaymentRequest;
pub use tariff::{CreateTariffRequest, UpdateTariffRequest};
pub use usage::{RecordUsageRequest, UpdateUsageRequest};
