//! Error types for Cairn operations.
//!
//! This module defines [`CairnError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - A coordinate, repository, path, or version that does not resolve is an
//!   explicit absence (`Ok(None)` / empty collection), never an error
//! - Use `CairnError` for failures that need distinct handling: rejected
//!   upstream calls, corrupt archives, missing configuration
//! - Use `anyhow::Error` (via `CairnError::Other`) for unexpected errors

use thiserror::Error;

/// Core error type for Cairn operations.
#[derive(Debug, Error)]
pub enum CairnError {
    /// A required configuration value is missing.
    #[error("Missing configuration: {message}")]
    ConfigMissing { message: String },

    /// An upstream request failed at the transport level.
    #[error("GitHub request failed for {url}: {message}")]
    Upstream { url: String, message: String },

    /// Access verification against the configured owner failed.
    #[error("Access verification failed for '{owner}': {message}")]
    AccessDenied { owner: String, message: String },

    /// A downloaded snapshot archive did not decode as a valid zip.
    #[error("Archive for {coordinate} is not a valid zip: {message}")]
    CorruptArchive { coordinate: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CairnError {
    /// Wrap a transport-level failure with the URL it occurred on.
    pub fn upstream(url: impl Into<String>, err: impl std::fmt::Display) -> Self {
        CairnError::Upstream {
            url: url.into(),
            message: err.to_string(),
        }
    }
}

/// Result type alias for Cairn operations.
pub type Result<T> = std::result::Result<T, CairnError>;
