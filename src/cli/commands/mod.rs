//! Command implementations, one module per subcommand family.

pub mod completions;
pub mod config;
pub mod create;
pub mod delete;
pub mod doctor;
pub mod exchange;
pub mod export;
pub mod init;
pub mod list;
pub mod schema;
pub mod show;
pub mod stats;
pub mod update;
pub mod version;

use ticketdesk_lib::{LabelKind, LabelSettings, Ticket};

use crate::error::Result;
use crate::format::MutationResult;
use crate::output::OutputContext;
use crate::validation::resolve_label;

/// Report a lookup miss. Misses are not errors: the command exits 0.
pub fn report_missing(action: &'static str, id: u64, ctx: &OutputContext) {
    if ctx.is_json() {
        ctx.json(&MutationResult::missing(action, id));
    } else {
        ctx.notice(&format!("No ticket #{id}"));
    }
}

/// Report a successful mutation.
pub fn report_applied(action: &'static str, ticket: &Ticket, message: &str, ctx: &OutputContext) {
    if ctx.is_json() {
        ctx.json(&MutationResult::applied(action, ticket));
    } else {
        ctx.message(message);
    }
}

/// Resolve an optional label argument against the active settings.
///
/// # Errors
///
/// Returns a validation error if the label is not offered.
pub fn resolve_optional(
    settings: &LabelSettings,
    kind: LabelKind,
    input: Option<&str>,
) -> Result<Option<String>> {
    input
        .map(|value| resolve_label(settings, kind, value))
        .transpose()
        .map_err(Into::into)
}
