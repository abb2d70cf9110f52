//! # App Error Type
//!
//! Errors surfaced by the `storesim` binary.
//!
//! ## Error Flow
//! ```text
//! config file ── io / toml ──────────┐
//! environment ── bad value ──────────┤
//! command line ── unknown flag ──────┼──► AppError ──► main prints, exits 1
//! store ── StoreError ───────────────┤
//! stdout ── io ──────────────────────┤
//! --json output ── serde_json ───────┘
//! ```

use storesim_core::{PolicyParseError, StoreError};
use thiserror::Error;

/// Result type alias for the binary.
pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Failed to read the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// The config file is not valid TOML for `StoreSimConfig`.
    #[error("Failed to parse config: {0}")]
    ConfigParse(String),

    /// The configuration parsed but holds an unusable value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // =========================================================================
    // Runtime Errors
    // =========================================================================
    /// Bad command line.
    #[error("{0}")]
    Usage(String),

    /// Failed to render JSON output.
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Writing demo output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::ConfigParse(err.to_string())
    }
}

impl From<PolicyParseError> for AppError {
    fn from(err: PolicyParseError) -> Self {
        AppError::InvalidConfig(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationFailed(err.to_string())
    }
}
