pub mod errors;
pub mod telemetry;
pub mod validations;

pub use errors::DomainError;
pub use telemetry::init_tracing;
pub use validations::validate_request;
