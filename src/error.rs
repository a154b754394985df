//! Error types for Solidafy Query
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for Solidafy Query
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Request Validation Errors
    // ============================================================================
    #[error("Malformed filter key '{key}': expected 'where__<field>[__<operator>]' or 'order__<field>'")]
    MalformedFilterKey { key: String },

    #[error("Unknown filter operator: {operator}")]
    UnknownOperator { operator: String },

    #[error("Operator '{operator}' expects {expected} comma-separated value(s), got {found}")]
    InvalidOperatorArity {
        operator: String,
        expected: String,
        found: usize,
    },

    #[error("Unknown field: {field}")]
    UnknownField { field: String },

    #[error("Invalid value '{value}' for field '{field}': expected {expected}")]
    InvalidFilterValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("Operator '{operator}' is not supported on field '{field}'")]
    OperatorNotSupported { operator: String, field: String },

    #[error("Invalid order direction '{value}' for field '{field}': expected ASC or DESC")]
    InvalidOrderDirection { field: String, value: String },

    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },

    // ============================================================================
    // Storage Errors
    // ============================================================================
    #[error("Storage error: {message}")]
    Storage { message: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a malformed key error
    pub fn malformed_key(key: impl Into<String>) -> Self {
        Self::MalformedFilterKey { key: key.into() }
    }

    /// Create an unknown operator error
    pub fn unknown_operator(operator: impl Into<String>) -> Self {
        Self::UnknownOperator {
            operator: operator.into(),
        }
    }

    /// Create an unknown field error
    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self::UnknownField {
            field: field.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Check if this error was caused by the request parameters.
    ///
    /// Client errors are raised before the repository is queried and map
    /// to a `400 Bad Request` at the HTTP layer.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::MalformedFilterKey { .. }
                | Error::UnknownOperator { .. }
                | Error::InvalidOperatorArity { .. }
                | Error::UnknownField { .. }
                | Error::InvalidFilterValue { .. }
                | Error::OperatorNotSupported { .. }
                | Error::InvalidOrderDirection { .. }
                | Error::InvalidParameter { .. }
        )
    }
}

impl From<duckdb::Error> for Error {
    fn from(err: duckdb::Error) -> Self {
        Self::storage(err.to_string())
    }
}

/// Result type alias for Solidafy Query
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::malformed_key("where__a__b__c");
        assert!(err.to_string().contains("where__a__b__c"));

        let err = Error::unknown_operator("fuzzy_match");
        assert_eq!(err.to_string(), "Unknown filter operator: fuzzy_match");

        let err = Error::InvalidOperatorArity {
            operator: "between".to_string(),
            expected: "2".to_string(),
            found: 3,
        };
        assert_eq!(
            err.to_string(),
            "Operator 'between' expects 2 comma-separated value(s), got 3"
        );

        let err = Error::storage("connection refused");
        assert_eq!(err.to_string(), "Storage error: connection refused");
    }

    #[test]
    fn test_is_client_error() {
        assert!(Error::malformed_key("where__").is_client_error());
        assert!(Error::unknown_operator("x").is_client_error());
        assert!(Error::unknown_field("x").is_client_error());
        assert!(Error::invalid_param("take", "must be positive").is_client_error());
        assert!(Error::InvalidOrderDirection {
            field: "createdAt".to_string(),
            value: "UP".to_string()
        }
        .is_client_error());

        assert!(!Error::storage("boom").is_client_error());
        assert!(!Error::config("bad").is_client_error());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::storage("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Storage error: inner"));
    }
}
