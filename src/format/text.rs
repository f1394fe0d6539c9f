//! Text formatting functions for `td`.
//!
//! Provides plain text (non-ANSI) formatting for terminal output:
//! - Status icons (○ ◐ ✓ ?)
//! - Label badges (`[High]`, `[Bug]`)
//! - Ticket line formatting
//! - Display-width aware padding and truncation

use ticketdesk_lib::{LabelSettings, Ticket};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Status icon characters.
pub mod icons {
    /// Initial status - waiting for work (hollow circle).
    pub const OPEN: &str = "○";
    /// Any status between first and last (half-filled).
    pub const IN_PROGRESS: &str = "◐";
    /// Final status (checkmark).
    pub const DONE: &str = "✓";
    /// Status not in the active set.
    pub const UNKNOWN: &str = "?";
}

/// Icon for a status, by its position in the configured status list.
#[must_use]
pub fn format_status_icon(status: &str, settings: &LabelSettings) -> &'static str {
    let count = settings.statuses.len();
    match settings.status_rank(status) {
        rank if rank >= count => icons::UNKNOWN,
        0 => icons::OPEN,
        rank if rank + 1 == count => icons::DONE,
        _ => icons::IN_PROGRESS,
    }
}

/// Format a label as a bracketed badge.
#[must_use]
pub fn format_badge(label: &str) -> String {
    format!("[{label}]")
}

/// Format a single-line ticket summary.
///
/// Format: `{icon} #{id} [{priority}] [{category}] {title}`
#[must_use]
pub fn format_ticket_line(ticket: &Ticket, settings: &LabelSettings) -> String {
    format!(
        "{} #{} {} {} {}",
        format_status_icon(&ticket.status, settings),
        ticket.id,
        format_badge(&ticket.priority),
        format_badge(&ticket.category),
        ticket.title,
    )
}

/// Terminal columns occupied by `text`.
#[must_use]
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Cut `text` to at most `max` columns, ending with `…` when shortened.
#[must_use]
pub fn truncate_to_width(text: &str, max: usize) -> String {
    if display_width(text) <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Right-pad `text` with spaces to `width` columns (truncating if longer).
#[must_use]
pub fn pad_to_width(text: &str, width: usize) -> String {
    let cut = truncate_to_width(text, width);
    let fill = width.saturating_sub(display_width(&cut));
    format!("{cut}{}", " ".repeat(fill))
}
