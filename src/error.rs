//! Error types for the resume extraction library.
//!
//! This module defines all error types that can occur while driving the
//! extraction pipeline. Field extraction itself never fails: a field that
//! cannot be found is an empty value with confidence 0.0, so the variants
//! below only cover structural misuse of the API surface.

/// Result type alias for resume extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during resume extraction.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The caller supplied an empty line sequence
    #[error("Input contains no lines")]
    EmptyInput,

    /// Serialization of the response contract failed
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unsupported feature
    #[error("Unsupported feature: {0}")]
    Unsupported(String),
}
