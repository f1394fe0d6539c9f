use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;
use std::process::ExitStatus;

use assert_cmd::Command;
use tempfile::TempDir;

/// A throwaway directory with an isolated home for running `td`.
pub struct TdWorkspace {
    _dir: TempDir,
    pub root: PathBuf,
    pub home: PathBuf,
}

impl TdWorkspace {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let root = dir.path().join("project");
        let home = dir.path().join("home");
        fs::create_dir_all(&root).expect("create project dir");
        fs::create_dir_all(&home).expect("create home dir");
        Self {
            _dir: dir,
            root,
            home,
        }
    }

    pub fn desk_dir(&self) -> PathBuf {
        self.root.join(".ticketdesk")
    }

    pub fn data_file(&self) -> PathBuf {
        self.desk_dir().join("tickets.json")
    }

    /// Replace the ticket file with fixture content.
    pub fn write_tickets(&self, json: &str) {
        fs::write(self.data_file(), json).expect("write tickets.json");
    }
}

pub struct TdOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// A `td` command in plain mode with an isolated environment.
pub fn td_command(workspace: &TdWorkspace) -> Command {
    let mut cmd = Command::cargo_bin("td").expect("td binary");
    cmd.current_dir(&workspace.root)
        .env("HOME", &workspace.home)
        .env("XDG_CONFIG_HOME", workspace.home.join(".config"))
        .env_remove("TICKETDESK_PASSWORD")
        .env_remove("TICKETDESK_DATA_FILE")
        .env_remove("RUST_LOG")
        .arg("--plain");
    cmd
}

/// Run `td` in plain mode inside the workspace.
pub fn run_td<I, S>(workspace: &TdWorkspace, args: I, label: &str) -> TdOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_td_with_env(workspace, args, &[], label)
}

pub fn run_td_with_env<I, S>(
    workspace: &TdWorkspace,
    args: I,
    env: &[(&str, &str)],
    label: &str,
) -> TdOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = td_command(workspace);
    cmd.args(args);
    for (key, value) in env {
        cmd.env(key, value);
    }

    let output = cmd.output().unwrap_or_else(|e| panic!("{label}: failed to run td: {e}"));
    TdOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}
