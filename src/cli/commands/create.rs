//! Create command implementation.

use ticketdesk_lib::{LabelKind, NewTicket};

use super::{report_applied, resolve_optional};
use crate::cli::CreateArgs;
use crate::config::DeskContext;
use crate::error::Result;
use crate::output::OutputContext;
use crate::validation::TicketValidator;

/// Execute the create command.
///
/// # Errors
///
/// Returns an error if validation fails (nothing is created) or the ticket
/// file cannot be written.
pub fn execute(args: &CreateArgs, desk: &DeskContext, ctx: &OutputContext) -> Result<()> {
    let fields = build_new_ticket(args, desk)?;
    TicketValidator::validate_new(&fields)?;

    let mut store = desk.open_store();
    let ticket = store.create_ticket(fields)?;
    store.save()?;

    report_applied(
        "create",
        &ticket,
        &format!("Created ticket #{}: {}", ticket.id, ticket.title),
        ctx,
    );
    Ok(())
}

/// Resolve labels and fill defaults from the active settings.
fn build_new_ticket(args: &CreateArgs, desk: &DeskContext) -> Result<NewTicket> {
    let labels = desk.labels();
    let category = resolve_optional(labels, LabelKind::Category, args.category.as_deref())?
        .unwrap_or_else(|| labels.default_category().to_string());
    let priority = resolve_optional(labels, LabelKind::Priority, args.priority.as_deref())?
        .unwrap_or_else(|| labels.default_priority().to_string());
    let status = resolve_optional(labels, LabelKind::Status, args.status.as_deref())?
        .unwrap_or_else(|| labels.initial_status().to_string());

    Ok(NewTicket {
        title: args.title.trim().to_string(),
        description: args.description.clone(),
        category,
        priority,
        status,
        tags: args.tags.iter().map(|t| t.trim().to_string()).collect(),
        created_at: None,
    })
}
