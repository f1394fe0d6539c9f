//! Conversation commands: `ask`, `respond` and `comment`.

use ticketdesk_lib::{TicketStore, Timestamp};

use super::{report_applied, report_missing};
use crate::cli::{AskArgs, CommentArgs, RespondArgs};
use crate::config::DeskContext;
use crate::error::Result;
use crate::output::OutputContext;
use crate::validation::validate_message;

/// Append a follow-up question.
///
/// # Errors
///
/// Returns an error if the text is blank or the ticket file cannot be written.
pub fn ask(args: &AskArgs, desk: &DeskContext, ctx: &OutputContext) -> Result<()> {
    validate_message("question", &args.question)?;
    let mut store = desk.open_store();
    if !store.add_exchange(args.id, &args.question, Timestamp::now()) {
        report_missing("ask", args.id, ctx);
        return Ok(());
    }
    save_and_report(&mut store, "ask", args.id, "Added question to", ctx)
}

/// Answer the most recent unanswered question.
///
/// # Errors
///
/// Returns an error if the text is blank, if the response would be dated
/// before the open question, or if the ticket file cannot be written.
pub fn respond(args: &RespondArgs, desk: &DeskContext, ctx: &OutputContext) -> Result<()> {
    validate_message("response", &args.response)?;
    let mut store = desk.open_store();
    if store.record_response(args.id, &args.response, Timestamp::now())? {
        return save_and_report(&mut store, "respond", args.id, "Recorded response on", ctx);
    }

    match store.get(args.id) {
        None => report_missing("respond", args.id, ctx),
        Some(ticket) => {
            if ctx.is_json() {
                ctx.json(&crate::format::MutationResult::applied("respond", ticket));
            } else {
                ctx.notice(&format!(
                    "Ticket #{} has no unanswered question; nothing changed",
                    args.id
                ));
            }
        }
    }
    Ok(())
}

/// Append a free-form comment.
///
/// # Errors
///
/// Returns an error if the text is blank or the ticket file cannot be written.
pub fn comment(args: &CommentArgs, desk: &DeskContext, ctx: &OutputContext) -> Result<()> {
    validate_message("comment", &args.text)?;
    let mut store = desk.open_store();
    if !store.add_comment(args.id, &args.text, Timestamp::now()) {
        report_missing("comment", args.id, ctx);
        return Ok(());
    }
    save_and_report(&mut store, "comment", args.id, "Added comment to", ctx)
}

fn save_and_report(
    store: &mut TicketStore,
    action: &'static str,
    id: u64,
    verb: &str,
    ctx: &OutputContext,
) -> Result<()> {
    store.save()?;
    if let Some(ticket) = store.get(id) {
        report_applied(action, ticket, &format!("{verb} ticket #{id}"), ctx);
    }
    Ok(())
}
