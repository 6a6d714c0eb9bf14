//! Error types for Palisade operations.
//!
//! This module defines [`PalisadeError`], the primary error type used
//! throughout the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `PalisadeError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `PalisadeError::Other`) for unexpected errors
//! - Module failures abort the remaining installation sequence; they are
//!   never retried or downgraded by the orchestrator

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for Palisade operations.
#[derive(Debug, Error)]
pub enum PalisadeError {
    /// Site configuration file not found at expected location.
    #[error("Site configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse the site configuration file.
    #[error("Failed to parse site config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values (e.g., duplicate module
    /// priorities).
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// A required site variable is absent or empty. Raised pre-flight,
    /// before any module touches the host.
    #[error("Missing required site variable '{key}'")]
    MissingConfig { key: String },

    /// A provisioning module's action did not complete. Fatal to the run;
    /// no later module executes.
    #[error("Module '{module}' failed: {message}")]
    ModuleFailure { module: String, message: String },

    /// Shell command could not be spawned or failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// The verification report could not be persisted. Fatal to the
    /// success signal even with a clean check battery.
    #[error("Failed to write verification report to {path}: {source}")]
    ReportIo {
        path: PathBuf,
        source: std::io::Error,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Palisade operations.
pub type Result<T> = std::result::Result<T, PalisadeError>;
