//! Bill aggregate

pub mod model;
pub mod repository;

pub use model::{Bill, BillStatus};
pub use repository::BillRepository;
