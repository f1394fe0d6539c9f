//! Config command implementation.

use std::collections::BTreeMap;

use crate::cli::{ConfigCommand, ConfigSubcommand};
use crate::config::{DeskContext, set_workspace_value};
use crate::error::Result;
use crate::output::OutputContext;

/// Execute `config list|get|set`.
///
/// # Errors
///
/// Returns an error for unknown keys, empty label lists, or when the
/// workspace config cannot be written.
pub fn execute(cmd: &ConfigCommand, desk: &DeskContext, ctx: &OutputContext) -> Result<()> {
    match &cmd.command {
        ConfigSubcommand::List => {
            let entries = desk.config.entries();
            if ctx.is_json() {
                let map: BTreeMap<&str, String> = entries.into_iter().collect();
                ctx.json(&map);
            } else {
                for (key, value) in entries {
                    println!("{key} = {value}");
                }
            }
        }
        ConfigSubcommand::Get { key } => {
            let value = desk.config.get(key)?;
            if ctx.is_json() {
                ctx.json(&serde_json::json!({ "key": key, "value": value }));
            } else {
                println!("{}", value.as_deref().unwrap_or("(unset)"));
            }
        }
        ConfigSubcommand::Set { key, value } => {
            let path = desk.config_path()?;
            set_workspace_value(&path, key, value)?;
            if ctx.is_json() {
                ctx.json(&serde_json::json!({
                    "key": key,
                    "path": path.display().to_string(),
                }));
            } else {
                ctx.message(&format!("Set {key} in {}", path.display()));
            }
        }
    }
    Ok(())
}
