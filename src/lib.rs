//! # PLaNner billing
//!
//! Electricity bill calculator for prepaid/postpaid household meters.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Billing calculator, entities and repository traits
//! - **application**: Services for tariffs, customers, usage, bills, payments, reports
//! - **infrastructure**: Storage backends (in-memory)
//! - **shared**: Errors, request validation, tracing setup
//! - **config**: TOML configuration
//!
//! ```
//! use planner::domain::billing::calculate_bill;
//! use planner::domain::{BillingPeriod, TariffRate, UsageReading};
//! use rust_decimal::Decimal;
//!
//! let period = BillingPeriod::new(3, 2024).unwrap();
//! let reading = UsageReading::new(Decimal::from(1000), Decimal::from(1100), period);
//! let tariff = TariffRate::new(900, Decimal::from(1352));
//!
//! let bill = calculate_bill(&reading, &tariff, 0);
//! assert_eq!(bill.total_due, 137_700);
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use config::{default_config_path, AppConfig, ConfigError, LoggingConfig};

pub use domain::billing::{
    calculate_bill, compute_admin_fee, compute_late_penalty, compute_usage_kwh,
    validate_meter_reading,
};
pub use domain::{BillBreakdown, BillingPolicy, DomainError, MeterValidation, TariffRate, UsageReading};
