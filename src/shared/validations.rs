use validator::Validate;

use super::errors::DomainError;

/// Runs `validator` rules on a request and folds field errors into a single
/// `DomainError::Validation` message (`field: message; field: message`).
pub fn validate_request<T: Validate>(request: &T) -> Result<(), DomainError> {
    let Err(errors) = request.validate() else {
        return Ok(());
    };

    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let msg = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{}: {}", field, msg)
            })
        })
        .collect();
    messages.sort();

    Err(DomainError::Validation(messages.join("; ")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "name is required"))]
        name: String,
        #[validate(range(min = 1, max = 12, message = "month must be 1-12"))]
        month: u32,
    }

    #[test]
    fn valid_request_passes() {
        let s = Sample {
            name: "ok".into(),
            month: 3,
        };
        assert!(validate_request(&s).is_ok());
    }

    #[test]
    fn field_errors_are_joined() {
        let s = Sample {
            name: String::new(),
            month: 13,
        };
        let err = validate_request(&s).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation: month: month must be 1-12; name: name is required"
        );
    }
}
