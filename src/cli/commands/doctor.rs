//! Doctor command implementation.
//!
//! Read-only health checks over the workspace, its config layers and the
//! ticket file. Nothing is repaired.

use std::path::{Path, PathBuf};

use serde::Serialize;
use ticketdesk_lib::json_file;
use ticketdesk_lib::{LabelSettings, TicketError};

use crate::config::{
    CONFIG_FILE_NAME, CliOverrides, DATA_FILE_NAME, DeskConfig, discover_desk_dir, load_config,
};
use crate::error::{DeskError, Result};
use crate::output::OutputContext;
use crate::validation::{LintKind, lint_tickets};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Ok,
    Warn,
    Error,
}

#[derive(Debug, Clone, Serialize)]
struct CheckResult {
    name: String,
    status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
struct DoctorReport {
    ok: bool,
    checks: Vec<CheckResult>,
}

fn push_check(
    checks: &mut Vec<CheckResult>,
    name: &str,
    status: CheckStatus,
    message: Option<String>,
    details: Option<serde_json::Value>,
) {
    checks.push(CheckResult {
        name: name.to_string(),
        status,
        message,
        details,
    });
}

fn has_error(checks: &[CheckResult]) -> bool {
    checks
        .iter()
        .any(|check| matches!(check.status, CheckStatus::Error))
}

fn print_report(report: &DoctorReport, ctx: &OutputContext) {
    if ctx.is_json() {
        ctx.json(report);
        return;
    }

    println!("td doctor");
    for check in &report.checks {
        let label = match check.status {
            CheckStatus::Ok => "OK",
            CheckStatus::Warn => "WARN",
            CheckStatus::Error => "ERROR",
        };
        if let Some(message) = &check.message {
            println!("{label} {}: {}", check.name, message);
        } else {
            println!("{label} {}", check.name);
        }
    }
}

/// Locate the workspace; a `--data-file` override makes it optional.
fn check_workspace(cli: &CliOverrides, checks: &mut Vec<CheckResult>) -> Option<PathBuf> {
    match discover_desk_dir(None) {
        Ok(dir) => {
            push_check(
                checks,
                "workspace",
                CheckStatus::Ok,
                Some(dir.display().to_string()),
                None,
            );
            Some(dir)
        }
        Err(DeskError::NotInitialized) if cli.data_file.is_some() => {
            push_check(
                checks,
                "workspace",
                CheckStatus::Warn,
                Some("No .ticketdesk directory; using --data-file".to_string()),
                None,
            );
            None
        }
        Err(err) => {
            push_check(
                checks,
                "workspace",
                CheckStatus::Error,
                Some(format!("{err}")),
                None,
            );
            None
        }
    }
}

fn check_config(
    desk_dir: Option<&Path>,
    cli: &CliOverrides,
    checks: &mut Vec<CheckResult>,
) -> Option<DeskConfig> {
    match load_config(desk_dir, cli) {
        Ok(config) => {
            let details = serde_json::json!({
                "categories": config.labels.categories,
                "priorities": config.labels.priorities,
                "statuses": config.labels.statuses,
                "password_gate": config.auth.password.is_some(),
            });
            push_check(checks, "config.parse", CheckStatus::Ok, None, Some(details));
            Some(config)
        }
        Err(err) => {
            let path = desk_dir.map(|d| d.join(CONFIG_FILE_NAME).display().to_string());
            push_check(
                checks,
                "config.parse",
                CheckStatus::Error,
                Some(err.to_string()),
                path.map(|p| serde_json::json!({ "path": p })),
            );
            None
        }
    }
}

fn check_leftover_temp(data_path: &Path, checks: &mut Vec<CheckResult>) {
    let mut tmp = data_path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    if tmp.exists() {
        push_check(
            checks,
            "data.temp_file",
            CheckStatus::Warn,
            Some("Leftover temp file from an interrupted save".to_string()),
            Some(serde_json::json!({ "path": tmp.display().to_string() })),
        );
    } else {
        push_check(checks, "data.temp_file", CheckStatus::Ok, None, None);
    }
}

fn check_data(data_path: &Path, settings: &LabelSettings, checks: &mut Vec<CheckResult>) {
    let path_detail = serde_json::json!({ "path": data_path.display().to_string() });
    let tickets = match json_file::try_load(data_path) {
        Ok(tickets) => {
            push_check(
                checks,
                "data.parse",
                CheckStatus::Ok,
                Some(format!("Parsed {} tickets", tickets.len())),
                Some(path_detail),
            );
            tickets
        }
        Err(TicketError::FileNotFound(_)) => {
            push_check(
                checks,
                "data.parse",
                CheckStatus::Warn,
                Some("Ticket file does not exist yet".to_string()),
                Some(path_detail),
            );
            return;
        }
        Err(err) => {
            push_check(
                checks,
                "data.parse",
                CheckStatus::Error,
                Some(format!("{err} (td would start from an empty list)")),
                Some(path_detail),
            );
            return;
        }
    };

    let lints = lint_tickets(&tickets, settings);
    if lints.is_empty() {
        push_check(checks, "data.lint", CheckStatus::Ok, None, None);
        return;
    }
    let status = if lints.iter().any(|l| l.kind == LintKind::DuplicateId) {
        CheckStatus::Error
    } else {
        CheckStatus::Warn
    };
    push_check(
        checks,
        "data.lint",
        status,
        Some(format!("{} finding(s)", lints.len())),
        Some(serde_json::json!({ "findings": lints })),
    );
}

fn collect_checks(cli: &CliOverrides) -> Vec<CheckResult> {
    let mut checks = Vec::new();
    let desk_dir = check_workspace(cli, &mut checks);
    if desk_dir.is_none() && cli.data_file.is_none() {
        return checks;
    }

    let Some(config) = check_config(desk_dir.as_deref(), cli, &mut checks) else {
        return checks;
    };
    let data_path = match (&config.data_file, &desk_dir) {
        (Some(path), _) => path.clone(),
        (None, Some(dir)) => dir.join(DATA_FILE_NAME),
        (None, None) => return checks,
    };

    check_data(&data_path, &config.labels, &mut checks);
    check_leftover_temp(&data_path, &mut checks);
    checks
}

/// Execute the doctor command.
///
/// Exits the process with status 1 when any check reports an error.
///
/// # Errors
///
/// Never fails today; problems are reported as checks.
pub fn execute(cli: &CliOverrides, ctx: &OutputContext) -> Result<()> {
    let checks = collect_checks(cli);
    let report = DoctorReport {
        ok: !has_error(&checks),
        checks,
    };
    print_report(&report, ctx);

    if !report.ok {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn find_check<'a>(checks: &'a [CheckResult], name: &str) -> Option<&'a CheckResult> {
        checks.iter().find(|check| check.name == name)
    }

    #[test]
    fn test_check_data_detects_corrupt_file() {
        crate::logging::init_test_logging();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tickets.json");
        fs::write(&path, "[{not json").unwrap();

        let mut checks = Vec::new();
        check_data(&path, &LabelSettings::default(), &mut checks);
        let check = find_check(&checks, "data.parse").expect("check present");
        assert!(matches!(check.status, CheckStatus::Error));
    }

    #[test]
    fn test_check_data_reports_lints() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tickets.json");
        fs::write(
            &path,
            r#"[
  {"id": 1, "title": "A", "description": "a", "category": "Hardware",
   "priority": "High", "status": "Open", "created_at": "2026-01-01 10:00:00"}
]"#,
        )
        .unwrap();

        let mut checks = Vec::new();
        check_data(&path, &LabelSettings::default(), &mut checks);
        assert!(matches!(
            find_check(&checks, "data.parse").unwrap().status,
            CheckStatus::Ok
        ));
        let lint = find_check(&checks, "data.lint").expect("lint check");
        assert!(matches!(lint.status, CheckStatus::Warn));
        assert!(!has_error(&checks));
    }

    #[test]
    fn test_missing_file_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let mut checks = Vec::new();
        check_data(&dir.path().join("none.json"), &LabelSettings::default(), &mut checks);
        check_leftover_temp(&dir.path().join("none.json"), &mut checks);
        assert!(!has_error(&checks));
    }

    #[test]
    fn test_data_file_override_without_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.json");
        fs::write(&path, "[]").unwrap();
        let cli = CliOverrides {
            data_file: Some(path),
            password: None,
        };
        let checks = collect_checks(&cli);
        assert!(find_check(&checks, "data.parse").is_some());
    }
}
