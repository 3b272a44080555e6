use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("tasklist-{nanos}-{file_name}"))
}

#[test]
fn cli_smoke_help() {
    let exe = env!("CARGO_BIN_EXE_tasklist_server");
    let output = Command::new(exe)
        .arg("--help")
        .output()
        .expect("failed to run tasklist_server --help");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--config-override"));
}

#[test]
fn print_config_reflects_overrides() {
    let exe = env!("CARGO_BIN_EXE_tasklist_server");
    let config_path = temp_path("server-config.json");
    let output = Command::new(exe)
        .args([
            "--print-config",
            "--port",
            "9123",
            "--config-override",
            "server.store_key=team_tasks",
        ])
        .env("TASKLIST_CONFIG_PATH", &config_path)
        .output()
        .expect("failed to run tasklist_server --print-config");

    assert!(output.status.success());
    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["server"]["port"], 9123);
    assert_eq!(config["server"]["store_key"], "team_tasks");
    assert_eq!(config["server"]["store"], "file");
}

#[test]
fn rejects_malformed_override() {
    let exe = env!("CARGO_BIN_EXE_tasklist_server");
    let config_path = temp_path("server-config-bad.json");
    let output = Command::new(exe)
        .args(["--print-config", "--config-override", "server.port=http"])
        .env("TASKLIST_CONFIG_PATH", &config_path)
        .output()
        .expect("failed to run tasklist_server");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
}
