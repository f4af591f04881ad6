//! Payment aggregate

pub mod model;
pub mod repository;

pub use model::{Payment, PaymentSummary};
pub use repository::PaymentRepository;
