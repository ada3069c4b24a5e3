//! Domain error types
//!
//! This module defines the error hierarchy for the OneRoster client.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main error type
///
/// This is the primary error type used throughout the crate.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum RosterError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// OneRoster API errors (authentication, transport, HTTP status)
    #[error("OneRoster error: {0}")]
    OneRoster(#[from] OneRosterError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl RosterError {
    /// Returns true if this error is an authentication failure
    pub fn is_authentication(&self) -> bool {
        matches!(self, RosterError::OneRoster(OneRosterError::Authentication(_)))
    }
}

/// OneRoster API errors
///
/// Errors that occur when talking to a OneRoster server. These errors
/// don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum OneRosterError {
    /// No valid session credential, or the server rejected it
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Network-level failure reaching the API host
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status from the API
    #[error("HTTP error: {status} - {body}")]
    Http { status: u16, body: String },

    /// Response body could not be decoded
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Request timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Page limit reached before the end of a collection
    #[error(
        "Incomplete {resource} collection: stopped after {pages} pages with {fetched} records"
    )]
    IncompleteCollection {
        resource: String,
        pages: usize,
        fetched: usize,
    },
}

impl OneRosterError {
    /// Whether retrying the request may succeed
    ///
    /// Transport failures, timeouts, throttling (429) and server errors (5xx)
    /// are retryable. Authentication and client errors are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            OneRosterError::Transport(_) | OneRosterError::Timeout(_) => true,
            OneRosterError::Http { status, .. } => *status == 429 || *status >= 500,
            OneRosterError::Authentication(_)
            | OneRosterError::InvalidResponse(_)
            | OneRosterError::IncompleteCollection { .. } => false,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for RosterError {
    fn from(err: std::io::Error) -> Self {
        RosterError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for RosterError {
    fn from(err: serde_json::Error) -> Self {
        RosterError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for RosterError {
    fn from(err: toml::de::Error) -> Self {
        RosterError::Configuration(format!("TOML parse error: {err}"))
    }
}
