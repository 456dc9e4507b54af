use assert_cmd::cargo::cargo_bin_cmd;

fn fixture(path: &str) -> String {
    format!("{}/tests/fixtures/{path}", env!("CARGO_MANIFEST_DIR"))
}

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("utf8")
}

#[test]
fn help_lists_flags() {
    let mut cmd = cargo_bin_cmd!("roster");
    cmd.arg("--help");
    let out = cmd.assert().success();
    let stdout = stdout_of(out.get_output());

    assert!(stdout.contains("--config"));
    assert!(stdout.contains("--capacity"));
    assert!(stdout.contains("--log-file"));
}

#[test]
fn add_fetch_quit_session_exits_zero() {
    let mut cmd = cargo_bin_cmd!("roster");
    cmd.write_stdin("1\nAlice\n30\n2\n0\n2\n1\n3\n");
    let out = cmd.assert().success();
    let stdout = stdout_of(out.get_output());

    assert!(stdout.starts_with("\nChoose an option:\n1. Add Record\n2. Fetch Record\n3. Quit\n"));
    assert!(stdout.contains("Enter name: Enter age: Record added successfully!"));
    assert!(stdout.contains("Record ID: 0\nName: Alice, Age: 30\n"));
    assert!(stdout.contains("Error: Invalid User ID."));
    assert!(stdout.ends_with("Exiting program...\n"));
}

#[test]
fn closed_stdin_ends_session_successfully() {
    let mut cmd = cargo_bin_cmd!("roster");
    cmd.write_stdin("9\n");
    let out = cmd.assert().success();
    let stdout = stdout_of(out.get_output());
    assert!(stdout.contains("Invalid choice, please try again."));
    assert!(!stdout.contains("Exiting program..."));
}

#[test]
fn config_file_capacity_is_enforced() {
    let mut cmd = cargo_bin_cmd!("roster");
    cmd.arg("--config")
        .arg(fixture("configs/small-store.toml"))
        .write_stdin("1\na\n1\n1\nb\n2\n1\nc\n3\n3\n");
    let out = cmd.assert().success();
    let stdout = stdout_of(out.get_output());
    assert_eq!(stdout.matches("Record added successfully!").count(), 2);
    assert_eq!(
        stdout.matches("Error: Maximum number of records reached.").count(),
        1
    );
}

#[test]
fn oversized_capacity_exits_nonzero() {
    let mut cmd = cargo_bin_cmd!("roster");
    cmd.arg("--config")
        .arg(fixture("configs/oversized-store.toml"))
        .write_stdin("3\n");
    cmd.assert().failure();
}

#[test]
fn missing_config_exits_nonzero() {
    let mut cmd = cargo_bin_cmd!("roster");
    cmd.arg("--config")
        .arg(fixture("configs/missing.toml"))
        .write_stdin("3\n");
    cmd.assert().failure();
}

#[test]
fn unknown_flag_exits_nonzero() {
    let mut cmd = cargo_bin_cmd!("roster");
    cmd.arg("--persist").write_stdin("3\n");
    cmd.assert().failure();
}

#[test]
fn log_file_receives_session_events() {
    let temp = tempfile::tempdir().expect("tempdir");
    let log_path = temp.path().join("logs/roster.jsonl");
    let mut cmd = cargo_bin_cmd!("roster");
    cmd.arg("--log-file")
        .arg(&log_path)
        .write_stdin("1\nAlice\nabc\n3\n");
    let out = cmd.assert().success();
    let stdout = stdout_of(out.get_output());
    assert!(stdout.contains("Error: 'abc' is not a valid number."));
    assert!(!stdout.contains("event_type"));

    let log = std::fs::read_to_string(&log_path).expect("log written");
    let events = log
        .lines()
        .map(|line| {
            let value: serde_json::Value = serde_json::from_str(line).expect("jsonl line");
            value["event_type"].as_str().unwrap_or_default().to_string()
        })
        .collect::<Vec<_>>();
    assert_eq!(events, vec!["session_started", "parse_error", "session_ended"]);
}
