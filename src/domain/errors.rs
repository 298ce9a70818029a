//! Domain error types
//!
//! This module defines the error hierarchy for skulabel.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main skulabel error type
///
/// This is the primary error type used throughout the library.
/// Catalog failures are nested in [`CatalogError`] so callers can branch on
/// the session-fatal cases without string matching.
#[derive(Debug, Error)]
pub enum SkuLabelError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Remote catalog errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Checkpoint persistence errors
    #[error("Checkpoint error: {0}")]
    Checkpoint(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Unexpected run-level faults (worker pool breakdown and similar)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SkuLabelError {
    /// Whether this error means the session credential is no longer accepted
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, SkuLabelError::Catalog(CatalogError::Unauthorized(_)))
    }
}

/// Remote catalog errors
///
/// Produced by the catalog adapter after the request layer has exhausted its
/// retries. Status codes are carried as plain integers (no HTTP client types).
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The credential was rejected (HTTP 401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// No response was obtained (timeout, connection failure, retries exhausted)
    #[error("No response for {0}")]
    NoResponse(String),

    /// Any other non-success status
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// Response body could not be understood
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for SkuLabelError {
    fn from(err: std::io::Error) -> Self {
        SkuLabelError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for SkuLabelError {
    fn from(err: serde_json::Error) -> Self {
        SkuLabelError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for SkuLabelError {
    fn from(err: toml::de::Error) -> Self {
        SkuLabelError::Configuration(format!("TOML parse error: {err}"))
    }
}
