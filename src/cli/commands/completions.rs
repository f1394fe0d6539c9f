//! Shell completion generation.

use std::io;

use clap::CommandFactory;
use clap_complete::generate;

use crate::cli::{Cli, CompletionsArgs};
use crate::error::Result;

/// Write the completion script for the requested shell to stdout.
///
/// # Errors
///
/// Returns an I/O error if stdout cannot be flushed.
pub fn execute(args: &CompletionsArgs) -> Result<()> {
    let mut stdout = io::stdout();
    write_completions(args, &mut stdout);
    io::Write::flush(&mut stdout)?;
    Ok(())
}

fn write_completions(args: &CompletionsArgs, out: &mut dyn io::Write) {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    generate(args.shell, &mut command, name, out);
}
