//! Result and error types for the core library

use thiserror::Error;

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    /// Local precondition failure. No network call was made and no state
    /// was mutated; the user must correct the input and re-trigger.
    #[error("{0}")]
    Validation(String),

    /// The payments API rejected a request or could not be reached.
    #[error("{0}")]
    Api(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an API error
    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for failures the user can fix locally (bad or missing input)
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = Error::validation("select a bank and a file");
        assert_eq!(err.to_string(), "select a bank and a file");
        assert!(err.is_validation());
    }

    #[test]
    fn test_api_error_is_not_validation() {
        let err = Error::api("HTTP 500");
        assert!(!err.is_validation());
    }
}
