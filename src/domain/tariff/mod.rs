//! Tariff aggregate

pub mod model;
pub mod repository;

pub use model::TariffRate;
pub use repository::TariffRepository;
