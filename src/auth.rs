//! Shared-password login gate.
//!
//! One static secret from the config is compared against operator input.
//! There is no per-user identity, hashing or lockout. When no password is
//! configured the gate is open.

use std::io::{self, BufRead, IsTerminal, Write};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use tracing::{debug, warn};

use crate::config::DeskConfig;
use crate::error::{DeskError, Result};

/// Where the operator's password comes from.
pub trait PasswordSource {
    /// Read one password attempt.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if input cannot be read.
    fn read_password(&mut self, prompt: &str) -> io::Result<String>;
}

/// Reads from the terminal without echo, or a plain line when stdin is
/// not a terminal.
pub struct TerminalPrompt;

impl PasswordSource for TerminalPrompt {
    fn read_password(&mut self, prompt: &str) -> io::Result<String> {
        if io::stdin().is_terminal() {
            read_hidden(prompt)
        } else {
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            Ok(line.trim_end_matches(['\r', '\n']).to_string())
        }
    }
}

/// Compare an attempt against the configured secret.
#[must_use]
pub fn verify(expected: &str, attempt: &str) -> bool {
    expected == attempt
}

/// Enforce the login gate for one invocation.
///
/// A password given on the command line (or via `TICKETDESK_PASSWORD`) is
/// checked directly; otherwise `source` is asked once.
///
/// # Errors
///
/// Returns `LoginRejected` on mismatch, or `Io` if the prompt fails.
pub fn require_login(
    config: &DeskConfig,
    supplied: Option<&str>,
    source: &mut dyn PasswordSource,
) -> Result<()> {
    let Some(expected) = config.auth.password.as_deref() else {
        debug!("no password configured; login gate open");
        return Ok(());
    };

    let attempt = match supplied {
        Some(value) => value.to_string(),
        None => source.read_password("Password: ")?,
    };

    if verify(expected, &attempt) {
        debug!("login accepted");
        Ok(())
    } else {
        warn!("login rejected");
        Err(DeskError::LoginRejected)
    }
}

fn read_hidden(prompt: &str) -> io::Result<String> {
    let mut stderr = io::stderr();
    write!(stderr, "{prompt}")?;
    stderr.flush()?;

    terminal::enable_raw_mode()?;
    let result = read_keys();
    terminal::disable_raw_mode()?;
    writeln!(stderr)?;
    result
}

fn read_keys() -> io::Result<String> {
    let mut buffer = String::new();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Enter => return Ok(buffer),
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Esc => {
                return Err(io::Error::new(io::ErrorKind::Interrupted, "login cancelled"));
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(io::Error::new(io::ErrorKind::Interrupted, "login cancelled"));
            }
            KeyCode::Char(c) => buffer.push(c),
            _ => {}
        }
    }
}
