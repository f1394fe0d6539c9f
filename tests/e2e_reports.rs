mod common;
use common::cli::{TdWorkspace, run_td, run_td_with_env};

const FIXTURE: &str = include_str!("fixtures/tickets.json");

fn seeded_workspace() -> TdWorkspace {
    let workspace = TdWorkspace::new();
    let init = run_td(&workspace, ["init"], "init");
    assert!(init.status.success(), "init failed: {}", init.stderr);
    workspace.write_tickets(FIXTURE);
    workspace
}

#[test]
fn test_stats_json_summary() {
    let workspace = seeded_workspace();
    let stats = run_td(&workspace, ["--json", "stats"], "stats");
    assert!(stats.status.success(), "stats failed: {}", stats.stderr);

    let value: serde_json::Value = serde_json::from_str(stats.stdout.trim()).expect("json");
    assert_eq!(value["total_tickets"], 2);
    assert_eq!(value["open_tickets"], 1);
    assert_eq!(value["total_exchanges"], 2);
    assert_eq!(value["answered_exchanges"], 1);
    assert_eq!(value["average_response_hours"], 3.0);
    assert_eq!(value["average_resolution_hours"], 0.0);
    assert_eq!(value["by_category"]["Bug"], 1);
    assert_eq!(value["created_per_day"]["2024-03-02"], 1);
}

#[test]
fn test_stats_respects_filters() {
    let workspace = seeded_workspace();
    let stats = run_td(&workspace, ["--json", "stats", "--status", "resolved"], "stats");
    assert!(stats.status.success(), "stats failed: {}", stats.stderr);
    let value: serde_json::Value = serde_json::from_str(stats.stdout.trim()).expect("json");
    assert_eq!(value["total_tickets"], 1);
    assert_eq!(value["answered_exchanges"], 0);
}

#[test]
fn test_export_csv_snapshot() {
    let workspace = seeded_workspace();
    let export = run_td(&workspace, ["export"], "export_csv");
    assert!(export.status.success(), "export failed: {}", export.stderr);
    insta::assert_snapshot!(export.stdout.trim_end(), @r"
    id,title,category,priority,status,created_at,exchanges,answered,last_response_at,tags
    1,Cannot log in,Bug,High,Open,2024-03-01 09:00:00,1,1,2024-03-01 12:00:00,login; mobile
    2,Dark mode,Feature Request,Low,Resolved,2024-03-02 10:00:00,1,0,,
    ");
}

#[test]
fn test_export_json_to_file() {
    let workspace = seeded_workspace();
    let export = run_td(
        &workspace,
        ["export", "-f", "json", "-o", "out/tickets.json", "--tag", "login"],
        "export_json",
    );
    assert!(export.status.success(), "export failed: {}", export.stderr);
    assert!(export.stdout.contains("Exported 1 ticket(s)"));

    let written = std::fs::read_to_string(workspace.root.join("out/tickets.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&written).expect("json");
    assert_eq!(value.as_array().map(Vec::len), Some(1));
    assert_eq!(value[0]["title"], "Cannot log in");
}

#[test]
fn test_login_gate() {
    let workspace = seeded_workspace();
    let set = run_td(&workspace, ["config", "set", "auth.password", "s3cret"], "set_password");
    assert!(set.status.success(), "config set failed: {}", set.stderr);

    let rejected = run_td(&workspace, ["--password", "wrong", "list"], "list_wrong");
    assert!(!rejected.status.success());
    assert!(rejected.stderr.contains("Login rejected"), "{}", rejected.stderr);

    let from_stdin = run_td(&workspace, ["list"], "list_no_password");
    assert!(!from_stdin.status.success());

    let accepted = run_td(&workspace, ["--password", "s3cret", "list"], "list_flag");
    assert!(accepted.status.success(), "list failed: {}", accepted.stderr);
    assert!(accepted.stdout.contains("Cannot log in"));

    let via_env = run_td_with_env(
        &workspace,
        ["list"],
        &[("TICKETDESK_PASSWORD", "s3cret")],
        "list_env",
    );
    assert!(via_env.status.success(), "list failed: {}", via_env.stderr);

    let doctor = run_td(&workspace, ["doctor"], "doctor_ungated");
    assert!(doctor.status.success(), "doctor failed: {}", doctor.stdout);
}

#[test]
fn test_config_set_and_get_labels() {
    let workspace = seeded_workspace();
    let set = run_td(
        &workspace,
        ["config", "set", "labels.categories", "Bug, Billing, Bug"],
        "set_categories",
    );
    assert!(set.status.success(), "config set failed: {}", set.stderr);

    let get = run_td(&workspace, ["config", "get", "labels.categories"], "get_categories");
    assert!(get.status.success());
    assert_eq!(get.stdout.trim(), "Bug, Billing");

    let create = run_td(
        &workspace,
        ["create", "Invoice wrong", "-d", "Charged twice", "-c", "billing"],
        "create_billing",
    );
    assert!(create.status.success(), "create failed: {}", create.stderr);
    assert!(create.stdout.contains("Created ticket #3"));

    let unknown = run_td(&workspace, ["config", "get", "labels.colors"], "get_unknown");
    assert!(!unknown.status.success());
    assert!(unknown.stderr.contains("unknown key"));
}

#[test]
fn test_doctor_reports_corrupt_file() {
    let workspace = seeded_workspace();
    let healthy = run_td(&workspace, ["doctor"], "doctor_ok");
    assert!(healthy.status.success(), "doctor failed: {}", healthy.stdout);
    assert!(healthy.stdout.contains("td doctor"));
    assert!(healthy.stdout.contains("OK workspace"));

    workspace.write_tickets("{ not json");
    let broken = run_td(&workspace, ["doctor"], "doctor_broken");
    assert!(!broken.status.success());
    assert!(broken.stdout.contains("ERROR data.parse"), "{}", broken.stdout);

    // A corrupt file still loads as empty for everyday commands.
    let list = run_td(&workspace, ["list"], "list_corrupt");
    assert!(list.status.success());
    assert!(list.stdout.contains("No tickets found."));
}

#[test]
fn test_create_keeps_tickets_with_null_fields() {
    let workspace = TdWorkspace::new();
    run_td(&workspace, ["init"], "init");
    workspace.write_tickets(
        r#"[
  {"id": 1, "title": "Kept", "description": "first", "category": "Bug",
   "priority": "High", "status": "Open", "created_at": "2024-03-01 09:00:00",
   "tags": null, "comments": null},
  {"id": 2, "title": "Also kept", "description": null, "created_at": "2024-03-02 09:00:00",
   "exchanges": [{"question_at": "2024-03-02 09:00:00", "question_text": "why",
                  "response_at": "2024-03-02 10:00:00", "response_text": null}]}
]"#,
    );

    let create = run_td(&workspace, ["create", "New", "-d", "third"], "create_after_nulls");
    assert!(create.status.success(), "create failed: {}", create.stderr);
    assert!(create.stdout.contains("Created ticket #3: New"));

    let saved = std::fs::read_to_string(workspace.data_file()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&saved).expect("json");
    let titles: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["Kept", "Also kept", "New"]);
    assert_eq!(value[0]["tags"], serde_json::json!([]));
    assert_eq!(value[1]["exchanges"][0]["response_text"], "");
}
