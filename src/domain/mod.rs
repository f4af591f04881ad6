pub mod bill;
pub mod billing;
pub mod customer;
pub mod payment;
pub mod period;
pub mod report;
pub mod repositories;
pub mod tariff;
pub mod usage;

// Re-export commonly used types
pub use bill::{Bill, BillStatus};
pub use billing::{BillBreakdown, BillingPolicy, MeterRejection, MeterValidation, Rupiah};
pub use customer::Customer;
pub use payment::{Payment, PaymentSummary};
pub use period::BillingPeriod;
pub use report::{
    BillFilter, BillReport, PaymentFilter, PaymentReport, UsageFilter, UsageReport,
};
pub use repositories::{DomainResult, RepositoryProvider};
pub use tariff::TariffRate;
pub use usage::{UsageReading, UsageRecord};

pub use crate::shared::errors::DomainError;
