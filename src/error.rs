//! Error types for the AutoStream chat client
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for AutoStream operations
///
/// This enum encompasses all possible errors that can occur during
/// configuration loading, backend requests, and session persistence.
///
/// Transport errors are recovered locally by the controller (they become
/// a generic transcript entry) and storage errors degrade to an in-memory
/// session token; neither is ever fatal to the client.
#[derive(Error, Debug)]
pub enum ChatClientError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Backend request errors (connection, status, malformed body)
    #[error("Backend error: {0}")]
    Backend(String),

    /// Session token storage errors
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

/// Result type alias for AutoStream operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
