mod common;
use common::cli::{TdWorkspace, run_td, td_command};
use predicates::prelude::*;

#[test]
fn test_create_delete_list_keeps_ids() {
    let workspace = TdWorkspace::new();
    let init = run_td(&workspace, ["init"], "init");
    assert!(init.status.success(), "init failed: {}", init.stderr);
    assert!(workspace.data_file().exists());

    let first = run_td(&workspace, ["create", "First", "-d", "first body"], "create_a");
    assert!(first.status.success(), "create failed: {}", first.stderr);
    assert!(first.stdout.contains("Created ticket #1: First"));

    let second = run_td(
        &workspace,
        ["create", "Second", "-d", "second body", "-c", "bug", "-p", "high"],
        "create_b",
    );
    assert!(second.status.success(), "create failed: {}", second.stderr);
    assert!(second.stdout.contains("Created ticket #2: Second"));

    let delete = run_td(&workspace, ["delete", "1"], "delete_a");
    assert!(delete.status.success(), "delete failed: {}", delete.stderr);
    assert!(delete.stdout.contains("Deleted ticket #1: First"));

    let list = run_td(&workspace, ["list"], "list");
    assert!(list.status.success(), "list failed: {}", list.stderr);
    assert!(!list.stdout.contains("First"));
    assert!(list.stdout.contains("#2 [High] [Bug] Second"), "{}", list.stdout);
    assert!(list.stdout.contains("1 ticket(s)"));
}

#[test]
fn test_lookup_miss_is_not_an_error() {
    let workspace = TdWorkspace::new();
    run_td(&workspace, ["init"], "init");

    let show = run_td(&workspace, ["show", "42"], "show_missing");
    assert!(show.status.success(), "show miss failed: {}", show.stderr);
    assert!(show.stdout.contains("No ticket #42"));

    let delete = run_td(&workspace, ["delete", "42"], "delete_missing");
    assert!(delete.status.success());
    assert!(delete.stdout.contains("No ticket #42"));

    let json = run_td(&workspace, ["--json", "respond", "42", "hello"], "respond_missing");
    assert!(json.status.success());
    let value: serde_json::Value = serde_json::from_str(json.stdout.trim()).expect("json");
    assert_eq!(value["id"], 42);
    assert_eq!(value["found"], false);
}

#[test]
fn test_ask_respond_round() {
    let workspace = TdWorkspace::new();
    run_td(&workspace, ["init"], "init");
    run_td(&workspace, ["create", "Printer", "-d", "It jams"], "create");

    let respond = run_td(&workspace, ["respond", "1", "Try a new cartridge"], "respond");
    assert!(respond.status.success(), "respond failed: {}", respond.stderr);

    let ask = run_td(&workspace, ["ask", "1", "Still jams"], "ask");
    assert!(ask.status.success(), "ask failed: {}", ask.stderr);

    let show = run_td(&workspace, ["--json", "show", "1"], "show");
    assert!(show.status.success());
    let value: serde_json::Value = serde_json::from_str(show.stdout.trim()).expect("json");
    assert_eq!(value["exchange_count"], 2);
    assert_eq!(value["answered_count"], 1);
    assert_eq!(value["awaiting_response"], true);
    assert!(value["support_response_at"].is_string());
}

#[test]
fn test_commands_require_workspace() {
    let workspace = TdWorkspace::new();
    let list = run_td(&workspace, ["list"], "list_uninitialized");
    assert!(!list.status.success());
    assert!(list.stderr.contains("td init"), "{}", list.stderr);
}

#[test]
fn test_invalid_label_is_rejected() {
    let workspace = TdWorkspace::new();
    run_td(&workspace, ["init"], "init");
    let create = run_td(
        &workspace,
        ["create", "Odd", "-d", "body", "-s", "Frozen"],
        "create_bad_status",
    );
    assert!(!create.status.success());
    assert!(create.stderr.contains("status"), "{}", create.stderr);
    assert_eq!(
        std::fs::read_to_string(workspace.data_file()).unwrap().trim(),
        "[]"
    );
}

#[test]
fn test_init_twice_needs_force() {
    let workspace = TdWorkspace::new();
    td_command(&workspace).arg("init").assert().success();

    td_command(&workspace)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Already initialized"));

    td_command(&workspace)
        .args(["create", "Keep me", "-d", "body"])
        .assert()
        .success();
    td_command(&workspace)
        .args(["init", "--force"])
        .assert()
        .success();
    td_command(&workspace)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Keep me"));
}

#[test]
fn test_data_file_override_outside_workspace() {
    let workspace = TdWorkspace::new();
    let data_file = workspace.home.join("elsewhere.json");

    td_command(&workspace)
        .args(["create", "Detached", "-d", "no workspace"])
        .env("TICKETDESK_DATA_FILE", &data_file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created ticket #1"));

    assert!(data_file.exists());
    assert!(!workspace.desk_dir().exists());
}
