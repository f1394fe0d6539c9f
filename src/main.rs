//! `ticketdesk` (td) - Support ticket tracker
//!
//! Tickets, their question/response exchanges and comments live in a single
//! JSON file; every invocation loads it, applies one operation and saves.

use ticketdesk::run;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
