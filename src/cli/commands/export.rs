//! Export command implementation.

use std::fs;

use serde::Serialize;
use ticketdesk_lib::export::export;

use crate::cli::ExportArgs;
use crate::config::DeskContext;
use crate::error::Result;
use crate::output::OutputContext;

#[derive(Serialize)]
struct ExportSummary<'a> {
    path: String,
    format: &'a str,
    count: usize,
}

/// Execute the export command.
///
/// Without `--output` the snapshot is written to stdout in every output
/// mode.
///
/// # Errors
///
/// Returns an error if serialization fails or the output file cannot be
/// written.
pub fn execute(args: &ExportArgs, desk: &DeskContext, ctx: &OutputContext) -> Result<()> {
    let store = desk.open_store();
    let filters = args.filters.to_filters(desk.labels());
    let tickets = store.list(&filters);
    let payload = export(tickets.iter().copied(), args.format)?;

    let Some(ref path) = args.output else {
        print!("{payload}");
        return Ok(());
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, payload)?;
    tracing::info!(path = %path.display(), count = tickets.len(), "exported tickets");

    if ctx.is_json() {
        ctx.json(&ExportSummary {
            path: path.display().to_string(),
            format: args.format.extension(),
            count: tickets.len(),
        });
    } else {
        ctx.message(&format!(
            "Exported {} ticket(s) to {}",
            tickets.len(),
            path.display()
        ));
    }
    Ok(())
}
