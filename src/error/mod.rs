//! Error types for the settlement engine boundary.
//!
//! The computation core never fails: malformed numbers, dates and JSON
//! degrade to safe defaults inside the calculators. The variants here
//! cover the boundary the embedding web layer crosses before invoking the
//! core — looking up records and decoding payloads — so the caller can map
//! them to HTTP responses.
//!
//! Each variant has a stable error code (e.g. `ACERTO-L001`) for
//! programmatic handling.

use thiserror::Error;

/// High-level error categories for classification and routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// A required record was not found.
    Lookup,
    /// An input payload could not be decoded at all.
    Payload,
    /// Unexpected errors, bugs, or unclassified issues.
    Internal,
}

impl ErrorCategory {
    /// Returns a human-readable description of the category.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Lookup => "Lookup error",
            Self::Payload => "Payload error",
            Self::Internal => "Internal error",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Main error type for engine boundary operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The provider record backing a report does not exist.
    #[error("provider not found: {0}")]
    ProviderNotFound(String),

    /// A payload field was structurally unusable (not merely malformed —
    /// malformed values degrade to defaults inside the core).
    #[error("invalid payload for '{field}': {message}")]
    InvalidPayload { field: String, message: String },

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Catch-all for other errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EngineError {
    /// Returns the error category for classification and routing.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::ProviderNotFound(_) => ErrorCategory::Lookup,
            Self::InvalidPayload { .. } | Self::Json(_) => ErrorCategory::Payload,
            Self::Other(_) => ErrorCategory::Internal,
        }
    }

    /// Returns a stable error code for programmatic handling.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ProviderNotFound(_) => "ACERTO-L001",
            Self::InvalidPayload { .. } => "ACERTO-P001",
            Self::Json(_) => "ACERTO-P002",
            Self::Other(_) => "ACERTO-X099",
        }
    }
}

/// Result type alias for engine boundary operations.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories() {
        assert_eq!(
            EngineError::ProviderNotFound("42".to_string()).category(),
            ErrorCategory::Lookup
        );
        assert_eq!(
            EngineError::InvalidPayload {
                field: "incidents".to_string(),
                message: "expected an array".to_string(),
            }
            .category(),
            ErrorCategory::Payload
        );
        assert_eq!(
            EngineError::Other(anyhow::anyhow!("boom")).category(),
            ErrorCategory::Internal
        );
    }

    #[test]
    fn codes_are_stable_and_prefixed() {
        let errors = [
            EngineError::ProviderNotFound(String::new()).error_code(),
            EngineError::InvalidPayload {
                field: String::new(),
                message: String::new(),
            }
            .error_code(),
            EngineError::Other(anyhow::anyhow!("x")).error_code(),
        ];
        for code in errors {
            assert!(code.starts_with("ACERTO-"));
        }
    }

    #[test]
    fn json_errors_convert() {
        let err: EngineError = serde_json::from_str::<()>("not json").unwrap_err().into();
        assert_eq!(err.category(), ErrorCategory::Payload);
    }

    #[test]
    fn display_includes_context() {
        let err = EngineError::ProviderNotFound("base-07".to_string());
        assert_eq!(err.to_string(), "provider not found: base-07");
    }
}
