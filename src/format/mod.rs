//! Output formatting for `td`.
//!
//! Supports both human-readable text output and machine-parseable JSON.
//! JSON mode sends clean JSON to stdout with diagnostics to stderr.
//!
//! # JSON Output Types
//!
//! - [`TicketWithCounts`] - Ticket with exchange counts (list)
//! - [`TicketDetails`] - Ticket with per-exchange response times (show)
//! - [`MutationResult`] - Outcome of a create/update/delete/exchange command

mod chart;
mod output;
mod text;

pub use chart::{BarLine, bar_lines, count_entries};
pub use output::{ExchangeView, MutationResult, TicketDetails, TicketWithCounts};
pub use text::{
    display_width, format_badge, format_status_icon, format_ticket_line, pad_to_width,
    truncate_to_width,
};
