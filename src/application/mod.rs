//! Use cases over the domain: request DTOs and the services that run them

pub mod dto;
pub mod services;

pub use services::{
    BillingService, CustomerService, PaymentService, ReportService, TariffService, UsageService,
};
