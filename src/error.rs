//! Error types for Temporal Selves
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Temporal Selves operations
///
/// This enum encompasses all possible errors that can occur during
/// configuration loading, completion requests, Data Foundry upserts,
/// profile storage, and chat orchestration.
#[derive(Error, Debug)]
pub enum TemporalError {
    /// Configuration-related errors (missing or malformed settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request validation errors (caller must retry with corrected input)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Completion backend errors (API calls, malformed responses, etc.)
    #[error("Completion error: {0}")]
    Completion(String),

    /// Data Foundry write failures, carrying the upstream status and body
    #[error("DF PUT failed ({status}): {detail}")]
    Dataset {
        /// HTTP status returned by the upstream PUT
        status: u16,
        /// Upstream response body
        detail: String,
    },

    /// A send was attempted on a track that already has one in flight
    #[error("A message is already being sent on this track")]
    SendInFlight,

    /// Profile storage errors (database operations)
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Temporal Selves operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
