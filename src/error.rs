//! Error types for the `td` binary.
//!
//! Library failures arrive as [`TicketError`]; everything the CLI layer adds
//! on top (workspace discovery, login, config files) lives here.

use std::path::PathBuf;

use thiserror::Error;
use ticketdesk_lib::TicketError;
use ticketdesk_lib::error::ValidationError;

/// Primary error type for `td`.
#[derive(Error, Debug)]
pub enum DeskError {
    /// Error from the ticket library (validation, storage, export).
    #[error(transparent)]
    Ticket(#[from] TicketError),

    // === Workspace Errors ===
    /// No `.ticketdesk` directory above the working directory.
    #[error("Ticketdesk not initialized: run 'td init' first")]
    NotInitialized,

    /// `td init` on an existing workspace without `--force`.
    #[error("Already initialized at '{path}'")]
    AlreadyInitialized { path: PathBuf },

    // === Access Errors ===
    /// The shared password did not match.
    #[error("Login rejected: wrong password")]
    LoginRejected,

    // === Configuration Errors ===
    /// Unknown key or malformed value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Config file is not valid YAML.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // === I/O Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DeskError {
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Ticket(TicketError::validation(field, reason))
    }

    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// True for operator input errors (shown as a form message).
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Ticket(err) if err.is_validation())
    }
}

impl From<Vec<ValidationError>> for DeskError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::Ticket(TicketError::from_validation_errors(errors))
    }
}

impl From<ValidationError> for DeskError {
    fn from(error: ValidationError) -> Self {
        Self::from(vec![error])
    }
}

/// Result type using `DeskError`.
pub type Result<T> = std::result::Result<T, DeskError>;
