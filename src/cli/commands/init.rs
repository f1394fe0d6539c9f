//! Init command implementation.

use std::fs;
use std::path::Path;

use crate::cli::InitArgs;
use crate::config::{CONFIG_FILE_NAME, DATA_FILE_NAME, DESK_DIR_NAME};
use crate::error::{DeskError, Result};
use crate::output::OutputContext;

const CONFIG_TEMPLATE: &str = r"# Ticketdesk workspace configuration
#
# Label lists may be YAML sequences or comma separated text.
# labels:
#   categories: [Bug, Feature Request, Question, Other]
#   priorities: [High, Medium, Low]
#   statuses: [Open, In Progress, Resolved]
#
# Shared password for every command that reads or changes tickets.
# auth:
#   password: change-me
#
# Ticket file, relative to this directory.
# data_file: tickets.json
";

const GITIGNORE: &str = r"# Interrupted saves
*.tmp
";

/// Execute the init command in the current directory.
///
/// # Errors
///
/// Returns `AlreadyInitialized` unless `--force` is given, or an I/O error
/// if the workspace files cannot be written.
pub fn execute(args: &InitArgs, ctx: &OutputContext) -> Result<()> {
    let desk_dir = Path::new(DESK_DIR_NAME);
    init_workspace(desk_dir, args.force)?;

    if ctx.is_json() {
        ctx.json(&serde_json::json!({
            "path": desk_dir.display().to_string(),
            "data_file": desk_dir.join(DATA_FILE_NAME).display().to_string(),
        }));
    } else {
        ctx.message(&format!("Initialized ticketdesk workspace in {DESK_DIR_NAME}/"));
    }
    Ok(())
}

/// Create the workspace directory and its files.
///
/// An existing ticket file is never overwritten, even with `force`.
fn init_workspace(desk_dir: &Path, force: bool) -> Result<()> {
    let data_path = desk_dir.join(DATA_FILE_NAME);
    if data_path.exists() && !force {
        return Err(DeskError::AlreadyInitialized { path: data_path });
    }
    fs::create_dir_all(desk_dir)?;

    if !data_path.exists() {
        fs::write(&data_path, "[]\n")?;
    }

    let config_path = desk_dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        fs::write(config_path, CONFIG_TEMPLATE)?;
    }

    let gitignore_path = desk_dir.join(".gitignore");
    if !gitignore_path.exists() {
        fs::write(gitignore_path, GITIGNORE)?;
    }

    tracing::info!(path = %desk_dir.display(), "initialized workspace");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLayer;

    #[test]
    fn init_creates_files_and_refuses_twice() {
        crate::logging::init_test_logging();
        let dir = tempfile::tempdir().unwrap();
        let desk = dir.path().join(DESK_DIR_NAME);

        init_workspace(&desk, false).unwrap();
        assert_eq!(fs::read_to_string(desk.join(DATA_FILE_NAME)).unwrap(), "[]\n");
        assert!(matches!(
            init_workspace(&desk, false),
            Err(DeskError::AlreadyInitialized { .. })
        ));
    }

    #[test]
    fn force_keeps_existing_tickets() {
        let dir = tempfile::tempdir().unwrap();
        let desk = dir.path().join(DESK_DIR_NAME);
        init_workspace(&desk, false).unwrap();
        fs::write(desk.join(DATA_FILE_NAME), "[{\"id\": 1}]").unwrap();
        fs::remove_file(desk.join(CONFIG_FILE_NAME)).unwrap();

        init_workspace(&desk, true).unwrap();
        assert_eq!(
            fs::read_to_string(desk.join(DATA_FILE_NAME)).unwrap(),
            "[{\"id\": 1}]"
        );
        assert!(desk.join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn config_template_loads_as_empty_layer() {
        let dir = tempfile::tempdir().unwrap();
        let desk = dir.path().join(DESK_DIR_NAME);
        init_workspace(&desk, false).unwrap();
        let layer = ConfigLayer::load(&desk.join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(layer, Some(ConfigLayer::default()));
    }
}
