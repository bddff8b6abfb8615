//! Error types for the formbridge core library
//!
//! This module defines the fatal error channel of the pipeline, using
//! thiserror for ergonomic error definitions and anyhow for flexible error
//! sources. Recoverable, field-scoped failures live in
//! [`crate::pipeline::failure::TransformationFailure`] instead: they are
//! aggregated per field rather than propagated, so they are deliberately not
//! part of this enum.

use thiserror::Error;

/// Main error type for formbridge operations
///
/// Every variant here is a programmer or configuration error: the pipeline
/// surfaces it immediately and does not attempt per-field recovery.
#[derive(Error, Debug)]
pub enum Error {
    /// A transformer violated its outbound contract
    ///
    /// `transform` must succeed for every well-typed input, including the
    /// null value. An error on the outbound path therefore indicates a bug
    /// in the transformer or a chain wired with incompatible stages.
    #[error("Transformer contract violation in '{transformer}': {message}")]
    Contract {
        transformer: String,
        message: String,
    },

    /// Invalid field or pipeline configuration detected at build time
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        field: Option<String>,
    },

    /// A pass was asked to process a field with no binding
    #[error("Unknown field: '{field}'")]
    UnknownField { field: String },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Generic internal error with context
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Conversion implementations
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}
