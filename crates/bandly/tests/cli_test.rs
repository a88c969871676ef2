#![allow(clippy::unwrap_used)]
// CLI smoke tests: argument parsing, help output, and offline failure modes.

use assert_cmd::Command;
use predicates::prelude::*;

fn bandly() -> Command {
    let mut cmd = Command::cargo_bin("bandly").unwrap();
    // Keep the host environment out of the tests.
    cmd.env_remove("BANDLY_PROFILE")
        .env_remove("BANDLY_BACKEND")
        .env_remove("BANDLY_TOKEN");
    cmd
}

#[test]
fn no_args_shows_help_and_usage_exit_code() {
    bandly()
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_lists_every_surface() {
    bandly()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("users"))
        .stdout(predicate::str::contains("courses"))
        .stdout(predicate::str::contains("exercises"))
        .stdout(predicate::str::contains("goals"))
        .stdout(predicate::str::contains("reminders"))
        .stdout(predicate::str::contains("sessions"))
        .stdout(predicate::str::contains("watch"));
}

#[test]
fn list_help_shows_filter_flags() {
    bandly()
        .args(["users", "list", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--role"))
        .stdout(predicate::str::contains("--status"))
        .stdout(predicate::str::contains("--search"))
        .stdout(predicate::str::contains("--page"));
}

#[test]
fn completions_generate_for_bash() {
    bandly()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bandly"));
}

#[test]
fn config_path_prints_a_path() {
    bandly()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn invalid_backend_url_is_a_usage_error() {
    bandly()
        .args(["whoami", "--backend", "not a url", "--token", "t"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Invalid value"));
}

#[test]
fn unreachable_backend_exits_with_connection_code() {
    bandly()
        .args(["whoami", "--backend", "http://127.0.0.1:1", "--token", "t"])
        .assert()
        .failure()
        .code(7);
}

#[test]
fn bad_uuid_is_rejected_at_parse_time() {
    bandly()
        .args([
            "users",
            "get",
            "not-a-uuid",
            "--backend",
            "http://127.0.0.1:1",
            "--token",
            "t",
        ])
        .assert()
        .failure()
        .code(2);
}
