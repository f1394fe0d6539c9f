//! Show command implementation.

use std::fmt::Write as _;

use rich_rust::prelude::*;
use ticketdesk_lib::Ticket;

use super::report_missing;
use crate::cli::ShowArgs;
use crate::config::DeskContext;
use crate::error::Result;
use crate::format::TicketDetails;
use crate::output::{OutputContext, OutputMode};

/// Execute the show command.
///
/// # Errors
///
/// Never fails today; an unknown id prints "No ticket #N".
pub fn execute(args: &ShowArgs, desk: &DeskContext, ctx: &OutputContext) -> Result<()> {
    let store = desk.open_store();
    let Some(ticket) = store.get(args.id) else {
        report_missing("show", args.id, ctx);
        return Ok(());
    };

    match ctx.mode() {
        OutputMode::Json => ctx.json(&TicketDetails::from(ticket)),
        OutputMode::Rich => render_ticket_rich(ticket, ctx),
        OutputMode::Plain => print!("{}", render_ticket_plain(ticket)),
    }
    Ok(())
}

fn format_hours(hours: f64) -> String {
    format!("{hours:.1}h")
}

fn render_ticket_plain(ticket: &Ticket) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#{} {}", ticket.id, ticket.title);
    let _ = writeln!(
        out,
        "Status: {}  Priority: {}  Category: {}",
        ticket.status, ticket.priority, ticket.category
    );
    let _ = writeln!(out, "Created: {}", ticket.created_at);
    if !ticket.tags.is_empty() {
        let _ = writeln!(out, "Tags: {}", ticket.tags.join(", "));
    }
    if let Some(ref at) = ticket.support_response_at {
        let _ = writeln!(out, "Last response: {at}");
    }

    let _ = writeln!(out, "\nDescription:");
    for line in ticket.description.lines() {
        let _ = writeln!(out, "  {line}");
    }

    let _ = writeln!(
        out,
        "\nExchanges ({}, {} answered):",
        ticket.exchanges.len(),
        ticket.answered_count()
    );
    for (index, exchange) in ticket.exchanges.iter().enumerate() {
        let _ = writeln!(
            out,
            "  [{}] Q {}: {}",
            index + 1,
            exchange.question_at,
            exchange.question_text
        );
        match exchange.response_at {
            Some(ref at) => {
                let elapsed = exchange
                    .response_hours()
                    .map(|h| format!(" (+{})", format_hours(h)))
                    .unwrap_or_default();
                let _ = writeln!(out, "      A {at}{elapsed}: {}", exchange.response_text);
            }
            None => {
                let _ = writeln!(out, "      (awaiting response)");
            }
        }
    }

    if !ticket.comments.is_empty() {
        let _ = writeln!(out, "\nComments:");
        for comment in &ticket.comments {
            let _ = writeln!(out, "  {}: {}", comment.at, comment.text);
        }
    }
    out
}

fn render_ticket_rich(ticket: &Ticket, ctx: &OutputContext) {
    let console = Console::default();
    let theme = ctx.theme();

    let mut content = Text::new("");
    content.append_styled(&ticket.title, theme.emphasis.clone());
    content.append("\n\n");

    let mut fields: Vec<(&str, String)> = vec![
        ("Status", ticket.status.clone()),
        ("Priority", ticket.priority.clone()),
        ("Category", ticket.category.clone()),
        ("Created", ticket.created_at.to_string()),
    ];
    if !ticket.tags.is_empty() {
        fields.push(("Tags", ticket.tags.join(", ")));
    }
    if let Some(hours) = ticket.first_response_hours() {
        fields.push(("First reply", format_hours(hours)));
    }
    let last_idx = fields.len().saturating_sub(1);
    for (idx, (label, value)) in fields.iter().enumerate() {
        let prefix = if idx == last_idx { "└── " } else { "├── " };
        content.append_styled(prefix, theme.dimmed.clone());
        content.append_styled(&format!("{label:<12}"), theme.accent.clone());
        content.append(&format!("{value}\n"));
    }

    content.append_styled("\nDescription\n", theme.section.clone());
    content.append(&format!("{}\n", ticket.description));

    content.append_styled(
        &format!(
            "\nExchanges ({}/{} answered)\n",
            ticket.answered_count(),
            ticket.exchanges.len()
        ),
        theme.section.clone(),
    );
    for (index, exchange) in ticket.exchanges.iter().enumerate() {
        content.append_styled(&format!("{:>3}. ", index + 1), theme.dimmed.clone());
        content.append_styled(&format!("{} ", exchange.question_at), theme.dimmed.clone());
        content.append(&format!("{}\n", exchange.question_text));
        match exchange.response_at {
            Some(ref at) => {
                content.append_styled("     ↳ ", theme.success.clone());
                content.append_styled(&format!("{at} "), theme.dimmed.clone());
                if let Some(hours) = exchange.response_hours() {
                    content.append_styled(
                        &format!("(+{}) ", format_hours(hours)),
                        theme.success.clone(),
                    );
                }
                content.append(&format!("{}\n", exchange.response_text));
            }
            None => {
                content.append_styled("     ↳ awaiting response\n", theme.warning.clone());
            }
        }
    }

    if !ticket.comments.is_empty() {
        content.append_styled("\nComments\n", theme.section.clone());
        for comment in &ticket.comments {
            content.append_styled(&format!("  {} ", comment.at), theme.dimmed.clone());
            content.append(&format!("{}\n", comment.text));
        }
    }

    let panel = Panel::from_rich_text(&content, ctx.width())
        .title(Text::styled(&format!("Ticket #{}", ticket.id), theme.panel_title.clone()));
    console.print_renderable(&panel);
}
