//! `ticketdesk` - Support ticket tracker
//!
//! This crate provides the `td` CLI on top of [`ticketdesk_lib`], which owns
//! the ticket model, the JSON file store and the aggregations.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`cli`] - Command-line interface using clap
//! - [`auth`] - Shared-password login gate
//! - [`config`] - Layered YAML configuration and workspace discovery
//! - [`error`] - Error types and handling
//! - [`format`] - Output formatting (text, JSON, charts)
//! - [`logging`] - `tracing` subscriber setup
//! - [`output`] - Output mode selection and rich styling
//! - [`validation`] - Input validation and stored-data lints

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod output;
pub mod validation;

pub use error::{DeskError, Result};

/// Run the CLI application.
///
/// This is the main entry point called from `main()`.
///
/// # Errors
///
/// Returns an error if command execution fails.
pub fn run() -> anyhow::Result<()> {
    cli::run()
}
