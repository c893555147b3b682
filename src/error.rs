//! Error types for devinit operations.
//!
//! This module defines [`DevInitError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Only [`DevInitError::FatalBootstrapFailure`] and
//!   [`DevInitError::UserCancelled`] stop a run; the runner catches every
//!   other variant at step granularity and turns it into a warning
//! - Use `anyhow::Error` (via `DevInitError::Other`) for unexpected errors
//! - All errors should provide actionable messages for users

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for devinit operations.
#[derive(Debug, Error)]
pub enum DevInitError {
    /// A tool a step needs is not on PATH. The step is skipped, not failed.
    #[error("{tool} not found")]
    PreconditionMissing { tool: String },

    /// An external action returned non-success.
    #[error("Step '{step}' failed: {message}")]
    ActionFailed { step: String, message: String },

    /// No package manager could be acquired; nothing can be installed.
    #[error("Package manager setup failed: {message}")]
    FatalBootstrapFailure { message: String },

    /// The user quit the checklist before confirming.
    #[error("Setup cancelled by user")]
    UserCancelled,

    /// A secret could not be read from the credential source.
    #[error("Credential '{reference}' unavailable: {source}")]
    CredentialUnavailable {
        reference: String,
        #[source]
        source: CredentialError,
    },

    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// Shell command failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Why a secret read failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// The secrets manager answered but has no such item.
    #[error("not found")]
    NotFound,

    /// The item exists but its value is empty.
    #[error("empty")]
    Empty,

    /// The secrets manager could not be reached at all.
    #[error("unreachable")]
    Unreachable,
}

/// Result type alias for devinit operations.
pub type Result<T> = std::result::Result<T, DevInitError>;
