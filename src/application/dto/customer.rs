//! Customer request DTOs

use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterCustomerRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 20, message = "meter_number must be 1-20 characters"))]
    pub meter_number: String,
    #[validate(length(max = 255, message = "address must be at most 255 characters"))]
    #[serde(default)]
    pub address: String,
    #[validate(range(min = 1, message = "tariff_id must be positive"))]
    pub tariff_id: i32,
}

/// Partial update; only the fields present are changed
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 20, message = "meter_number must be 1-20 characters"))]
    pub meter_number: Option<String>,
    #[validate(length(max = 255, message = "address must be at most 255 characters"))]
    pub address: Option<String>,
    #[validate(range(min = 1, message = "tariff_id must be positive"))]
    pub tariff_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_checks_only_present_fields() {
        assert!(UpdateCustomerRequest::default().validate().is_ok());

        let req = UpdateCustomerRequest {
            name: Some(String::new()),
            tariff_id: Some(0),
            ..Default::default()
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("tariff_id"));
        assert!(!fields.contains_key("meter_number"));
    }
}
