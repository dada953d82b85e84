//! Bridge between `validator` derive output and the API error
//! envelope.

use validator::Validate;

use crate::error::{AppError, FieldError};

/// Validate a request payload, flattening any failures into the
/// envelope's field-level `errors` array (HTTP 400).
pub fn validate_payload(input: &impl Validate) -> Result<(), AppError> {
    input.validate().map_err(|validation_errors| {
        let mut errors: Vec<FieldError> = validation_errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, failures)| {
                failures.iter().map(move |failure| FieldError {
                    field: field.to_string(),
                    message: failure
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{field} is invalid")),
                })
            })
            .collect();
        // HashMap iteration order is unstable; sort for deterministic output.
        errors.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
        AppError::FieldValidation(errors)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Probe {
        #[validate(length(min = 3, message = "Name must be at least 3 characters"))]
        name: String,
        #[validate(range(min = 0.0, max = 20.0, message = "Score must be between 0 and 20"))]
        score: f64,
    }

    #[test]
    fn test_valid_payload_passes() {
        let probe = Probe {
            name: "abc".to_string(),
            score: 20.0,
        };
        assert!(validate_payload(&probe).is_ok());
    }

    #[test]
    fn test_failures_are_flattened_per_field() {
        let probe = Probe {
            name: "ab".to_string(),
            score: 20.5,
        };
        let err = validate_payload(&probe).unwrap_err();
        assert_matches!(err, AppError::FieldValidation(errors) => {
            assert_eq!(errors.len(), 2);
            assert_eq!(errors[0].field, "name");
            assert_eq!(errors[0].message, "Name must be at least 3 characters");
            assert_eq!(errors[1].field, "score");
        });
    }
}
