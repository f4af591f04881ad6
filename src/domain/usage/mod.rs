//! Usage aggregate

pub mod model;
pub mod repository;

pub use model::{UsageReading, UsageRecord};
pub use repository::UsageRepository;
