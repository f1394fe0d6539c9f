//! Error types for `ticketdesk-lib`.
//!
//! Lookup misses are not errors here: mutations on an unknown ticket id
//! are silent no-ops that report `false`.

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for ticketdesk-lib operations.
#[derive(Error, Debug)]
pub enum TicketError {
    // === Validation Errors ===
    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Multiple validation errors occurred.
    #[error("Validation errors: {}", format_errors(.errors))]
    ValidationErrors { errors: Vec<ValidationError> },

    // === Storage Errors ===
    /// The store was never bound to a backing file.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Backing file not found (strict loads only).
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Backing file exists but is not a valid ticket array (strict loads only).
    #[error("Corrupt ticket file {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    // === Export Errors ===
    /// CSV export failed.
    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),

    /// Export buffer could not be finalized.
    #[error("Export error: {0}")]
    Export(String),

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single field validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl TicketError {
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn from_validation_errors(errors: Vec<ValidationError>) -> Self {
        if errors.len() == 1 {
            let err = &errors[0];
            Self::Validation {
                field: err.field.clone(),
                reason: err.message.clone(),
            }
        } else {
            Self::ValidationErrors { errors }
        }
    }

    /// True for errors that should be shown to the operator as a form
    /// message rather than as a failed operation.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::ValidationErrors { .. })
    }
}

/// Result type using `TicketError`.
pub type Result<T> = std::result::Result<T, TicketError>;
