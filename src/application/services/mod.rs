//! Application services

mod billing;
mod customer;
mod payment;
mod report;
mod tariff;
mod usage;

pub use billing::BillingService;
pub use customer::CustomerService;
pub use payment::PaymentService;
pub use report::ReportService;
pub use tariff::TariffService;
pub use usage::UsageService;
