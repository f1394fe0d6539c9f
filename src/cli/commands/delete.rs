//! Delete command implementation.

use super::{report_applied, report_missing};
use crate::cli::DeleteArgs;
use crate::config::DeskContext;
use crate::error::Result;
use crate::output::OutputContext;

/// Execute the delete command.
///
/// # Errors
///
/// Returns an error if the ticket file cannot be written.
pub fn execute(args: &DeleteArgs, desk: &DeskContext, ctx: &OutputContext) -> Result<()> {
    let mut store = desk.open_store();
    let Some(removed) = store.delete_ticket(args.id) else {
        report_missing("delete", args.id, ctx);
        return Ok(());
    };
    store.save()?;

    report_applied(
        "delete",
        &removed,
        &format!("Deleted ticket #{}: {}", removed.id, removed.title),
        ctx,
    );
    Ok(())
}
