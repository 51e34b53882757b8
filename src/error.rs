//! # Error Types
//!
//! Custom error types for GPS Bridge using `thiserror`.

use thiserror::Error;

/// Main error type for GPS Bridge
#[derive(Debug, Error)]
pub enum GpsBridgeError {
    /// Serial port errors (open/configuration failures)
    #[error("Serial error: {0}")]
    Serial(String),

    /// The serial link dropped mid-session (physical disconnect, not a timeout)
    #[error("Serial link lost: {0}")]
    LinkLost(String),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for GPS Bridge
pub type Result<T> = std::result::Result<T, GpsBridgeError>;
