use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin;
use predicates::prelude::*;
use std::fs;
use std::process::{Command as StdCommand, Stdio};
use std::time::Duration;

mod common;
use common::{Sandbox, wait_until};

fn modeswitch() -> Command {
    let mut cmd = Command::cargo_bin("modeswitch").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    modeswitch()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("trigger"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_trigger_creates_flag_file() {
    let sandbox = Sandbox::new();
    let config = sandbox.write_config("restart_delay = 5");

    modeswitch()
        .arg("--config")
        .arg(&config)
        .args(["trigger", "switch"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Requested 'switch'"));

    assert!(sandbox.trigger("switch").exists());
    assert!(!sandbox.trigger("cancel").exists());
}

#[test]
fn test_trigger_accepts_toggle_alias() {
    let sandbox = Sandbox::new();
    let config = sandbox.write_config("");

    modeswitch()
        .arg("--config")
        .arg(&config)
        .args(["trigger", "toggle"])
        .assert()
        .success();

    assert!(sandbox.trigger("switch").exists());
}

#[test]
fn test_trigger_rejects_unknown_kind() {
    let sandbox = Sandbox::new();
    let config = sandbox.write_config("");

    modeswitch()
        .arg("--config")
        .arg(&config)
        .args(["trigger", "reboot"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_config_json_reflects_file_and_env() {
    let sandbox = Sandbox::new();
    let config = sandbox.write_config("restart_delay = 2\nmode = \"manual\"");

    modeswitch()
        .arg("--config")
        .arg(&config)
        .args(["config", "--json"])
        .env("MODESWITCH_DISPLAY__ABORT_MSG", "Press again")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"restart_delay\": 2.0"))
        .stdout(predicate::str::contains("\"mode\": \"manual\""))
        .stdout(predicate::str::contains("Press again"));
}

#[test]
fn test_invalid_config_exits_with_code_2() {
    let sandbox = Sandbox::new();
    let config = sandbox.write_config("restart_delay = -3");

    modeswitch()
        .arg("--config")
        .arg(&config)
        .arg("config")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid configuration"))
        .stderr(predicate::str::contains("restart_delay"));
}

#[test]
fn test_missing_config_file_fails() {
    let sandbox = Sandbox::new();

    modeswitch()
        .arg("--config")
        .arg(sandbox.path().join("absent.toml"))
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_run_rejects_invalid_mode() {
    modeswitch()
        .args(["run", "--mode", "turbo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("turbo"));
}

#[test]
#[cfg(unix)]
fn test_daemon_consumes_switch_trigger() {
    let sandbox = Sandbox::new();
    let config = sandbox.write_config("restart_delay = 0");
    fs::create_dir_all(sandbox.trigger("switch").parent().unwrap()).unwrap();

    let mut daemon = StdCommand::new(cargo_bin("modeswitch"))
        .arg("--config")
        .arg(&config)
        .args(["run", "--mode", "auto", "--dry-run", "--headless"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    fs::write(sandbox.trigger("switch"), b"").unwrap();
    let consumed = wait_until(Duration::from_secs(5), || !sandbox.trigger("switch").exists());

    daemon.kill().unwrap();
    daemon.wait().unwrap();

    assert!(consumed, "daemon never picked up the switch trigger");
    // Dry run never writes the boot flag.
    assert!(!sandbox.flags().join(".pwnagotchi-manu").exists());
}
