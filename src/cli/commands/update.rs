//! Update command implementation.

use ticketdesk_lib::{LabelKind, TicketUpdate};

use super::{report_applied, report_missing, resolve_optional};
use crate::cli::UpdateArgs;
use crate::config::DeskContext;
use crate::error::{DeskError, Result};
use crate::output::OutputContext;
use crate::validation::TicketValidator;

/// Execute the update command.
///
/// # Errors
///
/// Returns an error if nothing would change, a field is invalid, or the
/// ticket file cannot be written.
pub fn execute(args: &UpdateArgs, desk: &DeskContext, ctx: &OutputContext) -> Result<()> {
    let update = build_update(args, desk)?;
    if update.is_empty() {
        return Err(DeskError::validation("update", "no changes requested"));
    }
    TicketValidator::validate_update(&update)?;

    let mut store = desk.open_store();
    if !store.update_ticket(args.id, &update)? {
        report_missing("update", args.id, ctx);
        return Ok(());
    }
    store.save()?;

    if let Some(ticket) = store.get(args.id) {
        report_applied("update", ticket, &format!("Updated ticket #{}", ticket.id), ctx);
    }
    Ok(())
}

fn build_update(args: &UpdateArgs, desk: &DeskContext) -> Result<TicketUpdate> {
    let labels = desk.labels();
    Ok(TicketUpdate {
        title: args.title.as_ref().map(|t| t.trim().to_string()),
        description: args.description.clone(),
        category: resolve_optional(labels, LabelKind::Category, args.category.as_deref())?,
        priority: resolve_optional(labels, LabelKind::Priority, args.priority.as_deref())?,
        status: resolve_optional(labels, LabelKind::Status, args.status.as_deref())?,
        add_tags: args.add_tags.iter().map(|t| t.trim().to_string()).collect(),
        remove_tags: args.remove_tags.iter().map(|t| t.trim().to_string()).collect(),
    })
}
