//! List command implementation.
//!
//! Primary browsing interface: independent filter passes, configurable sort
//! and `TicketWithCounts` JSON output.

use rich_rust::prelude::*;
use ticketdesk_lib::query::sort_tickets;
use ticketdesk_lib::{LabelSettings, Ticket};

use crate::cli::ListArgs;
use crate::config::DeskContext;
use crate::error::Result;
use crate::format::{
    TicketWithCounts, display_width, format_badge, format_status_icon, format_ticket_line,
    truncate_to_width,
};
use crate::output::{OutputContext, OutputMode};

/// Execute the list command.
///
/// # Errors
///
/// Never fails today: the ticket file loads fail-soft.
pub fn execute(args: &ListArgs, desk: &DeskContext, ctx: &OutputContext) -> Result<()> {
    let store = desk.open_store();
    let settings = desk.labels();
    let filters = args.filters.to_filters(settings);

    let mut tickets = store.list(&filters);
    sort_tickets(&mut tickets, args.sort, settings, args.reverse);
    if let Some(limit) = args.limit {
        tickets.truncate(limit);
    }

    match ctx.mode() {
        OutputMode::Json => {
            let rows: Vec<TicketWithCounts> =
                tickets.iter().map(|t| TicketWithCounts::from(*t)).collect();
            ctx.json(&rows);
        }
        OutputMode::Rich => render_list_rich(&tickets, settings, ctx),
        OutputMode::Plain => {
            if tickets.is_empty() {
                println!("No tickets found.");
            } else {
                for ticket in &tickets {
                    println!("{}", format_ticket_line(ticket, settings));
                }
                println!("\n{} ticket(s)", tickets.len());
            }
        }
    }

    Ok(())
}

fn priority_style(priority: &str, settings: &LabelSettings, ctx: &OutputContext) -> Style {
    let theme = ctx.theme();
    let rank = settings.priority_rank(priority);
    if rank == 0 {
        theme.error.clone()
    } else if rank + 1 < settings.priorities.len() {
        theme.warning.clone()
    } else {
        theme.dimmed.clone()
    }
}

fn render_list_rich(tickets: &[&Ticket], settings: &LabelSettings, ctx: &OutputContext) {
    let console = Console::default();
    let theme = ctx.theme();

    if tickets.is_empty() {
        let mut text = Text::new("");
        text.append_styled("No tickets found.", theme.dimmed.clone());
        console.print_renderable(&text);
        return;
    }

    for ticket in tickets {
        let icon = format_status_icon(&ticket.status, settings);
        let id = format!("#{:<4}", ticket.id);
        let priority = format_badge(&ticket.priority);
        let category = format_badge(&ticket.category);

        let used = display_width(icon)
            + display_width(&id)
            + display_width(&priority)
            + display_width(&category)
            + 6;
        let title = truncate_to_width(&ticket.title, ctx.width().saturating_sub(used).max(10));

        let mut line = Text::new("");
        line.append_styled(&format!("{icon} "), theme.accent.clone());
        line.append_styled(&format!("{id} "), theme.emphasis.clone());
        line.append_styled(
            &format!("{priority} "),
            priority_style(&ticket.priority, settings, ctx),
        );
        line.append_styled(&format!("{category} "), theme.dimmed.clone());
        line.append(&title);
        if ticket.has_unanswered() {
            line.append_styled(" ●", theme.warning.clone());
        }
        console.print_renderable(&line);
    }

    console.print("");
    let mut footer = Text::new("");
    footer.append_styled(&format!("{} ticket(s)", tickets.len()), theme.dimmed.clone());
    let awaiting = tickets.iter().filter(|t| t.has_unanswered()).count();
    if awaiting > 0 {
        footer.append_styled(
            &format!(", {awaiting} awaiting response (●)"),
            theme.warning.clone(),
        );
    }
    console.print_renderable(&footer);
}
