//! Validation helpers for `td`.
//!
//! Input checks run before a mutation reaches the store and return
//! structured validation errors. Lints inspect stored tickets for `td doctor`
//! and never modify them.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use ticketdesk_lib::error::ValidationError;
use ticketdesk_lib::{LabelKind, LabelSettings, NewTicket, Ticket, TicketUpdate, Timestamp};

const TITLE_MAX_CHARS: usize = 200;
const DESCRIPTION_MAX_BYTES: usize = 102_400;
const MESSAGE_MAX_BYTES: usize = 51_200;

/// Validates ticket fields entered by the operator.
pub struct TicketValidator;

impl TicketValidator {
    /// Validate the fields of a new ticket and return all errors found.
    ///
    /// # Errors
    ///
    /// Returns a `Vec<ValidationError>` if any rule is violated.
    pub fn validate_new(ticket: &NewTicket) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        check_title(&ticket.title, &mut errors);
        check_description(&ticket.description, &mut errors);
        for tag in &ticket.tags {
            if let Err(err) = TagValidator::validate(tag) {
                errors.push(err);
            }
        }
        finish(errors)
    }

    /// Validate the fields an edit would change.
    ///
    /// # Errors
    ///
    /// Returns a `Vec<ValidationError>` if any rule is violated.
    pub fn validate_update(update: &TicketUpdate) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if let Some(title) = update.title.as_deref() {
            check_title(title, &mut errors);
        }
        if let Some(description) = update.description.as_deref() {
            check_description(description, &mut errors);
        }
        for tag in &update.add_tags {
            if let Err(err) = TagValidator::validate(tag) {
                errors.push(err);
            }
        }
        finish(errors)
    }
}

fn check_title(title: &str, errors: &mut Vec<ValidationError>) {
    if title.trim().is_empty() {
        errors.push(ValidationError::new("title", "cannot be empty"));
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        errors.push(ValidationError::new("title", "exceeds 200 characters"));
    }
}

fn check_description(description: &str, errors: &mut Vec<ValidationError>) {
    if description.trim().is_empty() {
        errors.push(ValidationError::new("description", "cannot be empty"));
    }
    if description.len() > DESCRIPTION_MAX_BYTES {
        errors.push(ValidationError::new("description", "exceeds 100KB"));
    }
}

fn finish(errors: Vec<ValidationError>) -> Result<(), Vec<ValidationError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate question, response and comment text.
///
/// # Errors
///
/// Returns a `ValidationError` naming `field` if the text is blank or too long.
pub fn validate_message(field: &str, text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::new(field, "cannot be empty"));
    }
    if text.len() > MESSAGE_MAX_BYTES {
        return Err(ValidationError::new(field, "exceeds 50KB"));
    }
    Ok(())
}

static TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\p{N}][\p{L}\p{N} _.-]{0,49}$").expect("valid tag regex"));

/// Validates a single tag value.
pub struct TagValidator;

impl TagValidator {
    /// Validate a tag for length and allowed characters.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if the tag is invalid.
    pub fn validate(tag: &str) -> Result<(), ValidationError> {
        if tag.is_empty() {
            return Err(ValidationError::new("tag", "cannot be empty"));
        }
        if tag.chars().count() > 50 {
            return Err(ValidationError::new("tag", "exceeds 50 characters"));
        }
        if !TAG_PATTERN.is_match(tag) {
            return Err(ValidationError::new(
                "tag",
                format!(
                    "invalid tag '{tag}' (letters, digits, space, '_', '.', '-'; must start with a letter or digit)"
                ),
            ));
        }
        Ok(())
    }
}

/// Map operator input onto a label offered by the active settings.
///
/// Matching ignores case; the configured spelling is returned.
///
/// # Errors
///
/// Returns a `ValidationError` listing the offered labels when nothing
/// matches.
pub fn resolve_label(
    settings: &LabelSettings,
    kind: LabelKind,
    input: &str,
) -> Result<String, ValidationError> {
    settings
        .resolve(kind, input)
        .map(str::to_string)
        .ok_or_else(|| {
            ValidationError::new(
                kind.as_str(),
                format!(
                    "'{}' is not offered (choose one of: {})",
                    input.trim(),
                    settings.labels(kind).join(", ")
                ),
            )
        })
}

// ============================================================================
// Stored-data lints
// ============================================================================

/// What a lint found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LintKind {
    DuplicateId,
    UnknownLabel,
    MalformedTimestamp,
    ResponseBeforeQuestion,
}

/// One finding about a stored ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lint {
    pub ticket_id: u64,
    pub kind: LintKind,
    pub message: String,
}

impl Lint {
    fn new(ticket_id: u64, kind: LintKind, message: impl Into<String>) -> Self {
        Self {
            ticket_id,
            kind,
            message: message.into(),
        }
    }
}

/// Inspect stored tickets against the active settings.
#[must_use]
pub fn lint_tickets(tickets: &[Ticket], settings: &LabelSettings) -> Vec<Lint> {
    let mut lints = Vec::new();

    let mut seen: BTreeMap<u64, usize> = BTreeMap::new();
    for ticket in tickets {
        *seen.entry(ticket.id).or_default() += 1;
    }
    for (id, count) in seen.into_iter().filter(|(_, count)| *count > 1) {
        lints.push(Lint::new(
            id,
            LintKind::DuplicateId,
            format!("id #{id} is used by {count} tickets"),
        ));
    }

    for ticket in tickets {
        lint_labels(ticket, settings, &mut lints);
        lint_timestamps(ticket, &mut lints);
    }
    lints
}

fn lint_labels(ticket: &Ticket, settings: &LabelSettings, lints: &mut Vec<Lint>) {
    for (kind, value) in [
        (LabelKind::Category, &ticket.category),
        (LabelKind::Priority, &ticket.priority),
        (LabelKind::Status, &ticket.status),
    ] {
        if !settings.offers(kind, value) {
            lints.push(Lint::new(
                ticket.id,
                LintKind::UnknownLabel,
                format!("{} '{value}' is not in the active set", kind.as_str()),
            ));
        }
    }
}

fn lint_timestamps(ticket: &Ticket, lints: &mut Vec<Lint>) {
    let mut check = |field: String, value: &Timestamp| {
        if value.parse().is_none() {
            lints.push(Lint::new(
                ticket.id,
                LintKind::MalformedTimestamp,
                format!("{field} '{value}' is not a valid timestamp"),
            ));
        }
    };

    check("created_at".to_string(), &ticket.created_at);
    if let Some(ref at) = ticket.support_response_at {
        check("support_response_at".to_string(), at);
    }
    for (index, exchange) in ticket.exchanges.iter().enumerate() {
        check(format!("exchanges[{index}].question_at"), &exchange.question_at);
        if let Some(ref at) = exchange.response_at {
            check(format!("exchanges[{index}].response_at"), at);
        }
    }

    for (index, exchange) in ticket.exchanges.iter().enumerate() {
        let Some(ref response_at) = exchange.response_at else {
            continue;
        };
        if let Some(hours) = exchange.question_at.hours_until(response_at) {
            if hours < 0.0 {
                lints.push(Lint::new(
                    ticket.id,
                    LintKind::ResponseBeforeQuestion,
                    format!("exchanges[{index}] was answered before it was asked"),
                ));
            }
        }
    }
}
