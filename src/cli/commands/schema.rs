//! Schema command implementation.

use schemars::schema::RootSchema;
use schemars::schema_for;
use ticketdesk_lib::Ticket;

use crate::output::OutputContext;

/// JSON Schema of the ticket file: a top-level array of tickets.
#[must_use]
pub fn ticket_file_schema() -> RootSchema {
    schema_for!(Vec<Ticket>)
}

/// Print the ticket file schema. Always JSON, whatever the output mode.
pub fn execute(ctx: &OutputContext) {
    ctx.json(&ticket_file_schema());
}
