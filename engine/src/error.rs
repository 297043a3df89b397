//! Error types for the Campus engine.

use crate::validate::FieldErrors;
use thiserror::Error;

/// All possible errors from the Campus engine.
///
/// The listing pipeline itself never fails; these cover parsing of
/// user-facing identifiers, screen configuration and payload validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Lookup errors
    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    #[error("unknown role: {0}")]
    UnknownRole(String),

    // Screen errors
    #[error("invalid page size: {0} (must be at least 1)")]
    InvalidPageSize(usize),

    // Validation errors
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("missing required field: {0}")]
    MissingRequiredField(String),

    #[error("type mismatch for field '{field}': expected {expected}, got {got}")]
    TypeMismatch {
        field: String,
        expected: String,
        got: String,
    },

    #[error("validation failed for {} field(s)", .0.len())]
    Validation(FieldErrors),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::UnknownEntity("courses".into());
        assert_eq!(err.to_string(), "unknown entity: courses");

        let err = Error::InvalidPageSize(0);
        assert_eq!(err.to_string(), "invalid page size: 0 (must be at least 1)");

        let err = Error::TypeMismatch {
            field: "creditos".into(),
            expected: "Int".into(),
            got: "String".into(),
        };
        assert_eq!(
            err.to_string(),
            "type mismatch for field 'creditos': expected Int, got String"
        );
    }

    #[test]
    fn validation_display_counts_fields() {
        let mut errors = FieldErrors::new();
        errors.insert("nrc", "required");
        errors.insert("salon", "required");
        let err = Error::Validation(errors);
        assert_eq!(err.to_string(), "validation failed for 2 field(s)");
    }
}
