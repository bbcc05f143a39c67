use std::io;
use thiserror::Error;

/// Application-wide error type, consolidating all possible errors into a single enum.
#[derive(Debug, Error)]
pub enum AppError {
    /// Represents standard input/output errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Represents data validation errors (e.g., an out-of-range threshold).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents configuration-related errors (e.g., an unparsable environment variable).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Represents serialization errors when rendering an analysis.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation errors: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = AppError::Config("MATHQUERY_CONFIDENCE_THRESHOLD".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: MATHQUERY_CONFIDENCE_THRESHOLD"
        );
    }

    #[test]
    fn test_from_io() {
        let err: AppError = io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed").into();
        assert!(matches!(err, AppError::Io(_)));
    }

    #[test]
    fn test_from_json() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: AppError = json_err.into();
        assert!(err.to_string().starts_with("JSON error:"));
    }
}
