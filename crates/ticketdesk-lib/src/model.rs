//! Core data types for ticketdesk-lib.
//!
//! The serde shape here *is* the persisted file format: a top-level JSON
//! array of [`Ticket`] objects. Older files lack `tags`, `comments` and
//! `exchanges`, so every collection field defaults to empty and
//! [`Ticket::normalize`] restores the invariants once after loading.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Canonical on-disk timestamp layout.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A persisted timestamp.
///
/// Stored as text so that values written by older versions (or by hand)
/// survive a load/save round trip even when they do not parse. Time
/// arithmetic goes through [`Timestamp::parse`], which returns `None` for
/// malformed text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    /// Current local wall-clock time, truncated to seconds.
    #[must_use]
    pub fn now() -> Self {
        Self::from_naive(Local::now().naive_local())
    }

    #[must_use]
    pub fn from_naive(value: NaiveDateTime) -> Self {
        Self(value.format(TIMESTAMP_FORMAT).to_string())
    }

    /// Wrap raw text without checking it.
    #[must_use]
    pub fn from_raw(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse into a naive date-time.
    ///
    /// Accepts the canonical layout, ISO `T`-separated layouts with optional
    /// fractional seconds, RFC 3339 (offset dropped after conversion to the
    /// stated wall-clock), and a bare date (midnight).
    #[must_use]
    pub fn parse(&self) -> Option<NaiveDateTime> {
        let raw = self.0.trim();
        if let Ok(value) = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT) {
            return Some(value);
        }
        for layout in [
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%dT%H:%M",
        ] {
            if let Ok(value) = NaiveDateTime::parse_from_str(raw, layout) {
                return Some(value);
            }
        }
        if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
            return Some(value.naive_local());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .map(|date| date.and_time(NaiveTime::MIN))
    }

    /// Calendar date of this timestamp, if it parses.
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        self.parse().map(|value| value.date())
    }

    /// Grouping key for daily series: the first 10 characters
    /// (`YYYY-MM-DD` for well-formed values).
    #[must_use]
    pub fn day_key(&self) -> String {
        self.0.chars().take(10).collect()
    }

    /// Grouping key for monthly series: the first 7 characters (`YYYY-MM`).
    #[must_use]
    pub fn month_key(&self) -> String {
        self.0.chars().take(7).collect()
    }

    /// Signed hours from `self` to `later`, or `None` if either side is
    /// malformed.
    #[must_use]
    pub fn hours_until(&self, later: &Self) -> Option<f64> {
        let start = self.parse()?;
        let end = later.parse()?;
        Some((end - start).num_seconds() as f64 / 3600.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(value: NaiveDateTime) -> Self {
        Self::from_naive(value)
    }
}

/// Read an explicit `null` as the field's default.
///
/// `#[serde(default)]` only covers a missing key; hand-edited and older
/// files also write `null` for empty values.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One question/response pair in a ticket's conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Exchange {
    pub question_at: Timestamp,
    #[serde(default, deserialize_with = "null_as_default")]
    #[schemars(with = "Option<String>")]
    pub question_text: String,
    /// Absent while the exchange is unanswered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_at: Option<Timestamp>,
    #[serde(default, deserialize_with = "null_as_default")]
    #[schemars(with = "Option<String>")]
    pub response_text: String,
}

impl Exchange {
    /// A fresh, unanswered exchange.
    #[must_use]
    pub fn question(text: impl Into<String>, at: Timestamp) -> Self {
        Self {
            question_at: at,
            question_text: text.into(),
            response_at: None,
            response_text: String::new(),
        }
    }

    #[must_use]
    pub const fn is_answered(&self) -> bool {
        self.response_at.is_some()
    }

    /// Hours between question and response.
    ///
    /// `None` when unanswered, when either timestamp is malformed, or when
    /// the response predates the question.
    #[must_use]
    pub fn response_hours(&self) -> Option<f64> {
        let answered_at = self.response_at.as_ref()?;
        self.question_at
            .hours_until(answered_at)
            .filter(|hours| *hours >= 0.0)
    }
}

/// A timestamped free-text note on a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Comment {
    pub at: Timestamp,
    #[serde(default, deserialize_with = "null_as_default")]
    #[schemars(with = "Option<String>")]
    pub text: String,
}

/// The primary ticket entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Ticket {
    /// Unique id, assigned as max+1 at creation.
    pub id: u64,

    /// Title (non-empty).
    pub title: String,

    #[serde(default, deserialize_with = "null_as_default")]
    #[schemars(with = "Option<String>")]
    pub description: String,

    #[serde(default, deserialize_with = "null_as_default")]
    #[schemars(with = "Option<String>")]
    pub category: String,

    #[serde(default, deserialize_with = "null_as_default")]
    #[schemars(with = "Option<String>")]
    pub priority: String,

    #[serde(default, deserialize_with = "null_as_default")]
    #[schemars(with = "Option<String>")]
    pub status: String,

    /// Creation timestamp, immutable.
    pub created_at: Timestamp,

    #[serde(default, deserialize_with = "null_as_default")]
    #[schemars(with = "Option<Vec<String>>")]
    pub tags: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    #[schemars(with = "Option<Vec<Comment>>")]
    pub comments: Vec<Comment>,

    #[serde(default, deserialize_with = "null_as_default")]
    #[schemars(with = "Option<Vec<Exchange>>")]
    pub exchanges: Vec<Exchange>,

    /// Mirror of the most recent recorded response time. Older files carry
    /// only this field and no exchanges.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_response_at: Option<Timestamp>,
}

impl Ticket {
    /// Restore model invariants on a ticket read from disk.
    ///
    /// - A ticket without exchanges gets a seed exchange built from its
    ///   creation time and description, answered at `support_response_at`
    ///   when that legacy field is present.
    /// - Duplicate tags are dropped, keeping the first occurrence.
    /// - `support_response_at` is back-filled from the latest answered
    ///   exchange when missing.
    ///
    /// Returns true if anything changed.
    pub fn normalize(&mut self) -> bool {
        let mut changed = false;

        if self.exchanges.is_empty() {
            let mut seed = Exchange::question(self.description.clone(), self.created_at.clone());
            seed.response_at.clone_from(&self.support_response_at);
            self.exchanges.push(seed);
            changed = true;
        }

        let before = self.tags.len();
        let mut seen = Vec::with_capacity(before);
        self.tags.retain(|tag| {
            if seen.contains(tag) {
                false
            } else {
                seen.push(tag.clone());
                true
            }
        });
        changed |= self.tags.len() != before;

        if self.support_response_at.is_none() {
            let latest = self.latest_response_at().cloned();
            if latest.is_some() {
                self.support_response_at = latest;
                changed = true;
            }
        }

        changed
    }

    /// Index of the most recently appended unanswered exchange.
    #[must_use]
    pub fn last_unanswered_index(&self) -> Option<usize> {
        self.exchanges.iter().rposition(|exchange| !exchange.is_answered())
    }

    #[must_use]
    pub fn has_unanswered(&self) -> bool {
        self.last_unanswered_index().is_some()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.exchanges.iter().filter(|e| e.is_answered()).count()
    }

    /// Latest `response_at` among answered exchanges, by position.
    #[must_use]
    pub fn latest_response_at(&self) -> Option<&Timestamp> {
        self.exchanges
            .iter()
            .rev()
            .find_map(|exchange| exchange.response_at.as_ref())
    }

    /// Hours from ticket creation to its latest response.
    #[must_use]
    pub fn resolution_hours(&self) -> Option<f64> {
        let last = self.latest_response_at()?;
        self.created_at
            .hours_until(last)
            .filter(|hours| *hours >= 0.0)
    }

    /// Hours from ticket creation to the first answered exchange.
    #[must_use]
    pub fn first_response_hours(&self) -> Option<f64> {
        let first = self
            .exchanges
            .iter()
            .find_map(|exchange| exchange.response_at.as_ref())?;
        self.created_at
            .hours_until(first)
            .filter(|hours| *hours >= 0.0)
    }

    /// Case-insensitive substring match over title and description.
    #[must_use]
    pub fn matches_text(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
            || self.description.to_lowercase().contains(needle_lower)
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Fields submitted when creating a ticket.
#[derive(Debug, Clone, Default)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: String,
    pub status: String,
    pub tags: Vec<String>,
    /// Creation time; `None` means "now".
    pub created_at: Option<Timestamp>,
}
