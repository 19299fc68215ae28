#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

struct Env {
    temp: TempDir,
}

impl Env {
    fn new() -> Self {
        Self {
            temp: TempDir::new().unwrap(),
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(cargo_bin("hiredesk"));
        cmd.env("HIREDESK_DATA", self.temp.path().join("data"))
            .env("HIREDESK_SESSION_DATA", self.temp.path().join("session"))
            .env_remove("HIREDESK_LOG");
        cmd
    }
}

#[test]
fn test_first_run_seeds_and_lists() {
    let env = Env::new();

    env.cmd()
        .args(["list", "candidates"])
        .assert()
        .success()
        .stdout(predicate::str::contains("김민준"));

    env.cmd()
        .args(["seed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing seeded"));
}

#[test]
fn test_save_get_delete_workflow() {
    let env = Env::new();
    let input = env.temp.path().join("job.json");
    fs::write(&input, r#"{ "title": "SRE", "department": "Infra" }"#).unwrap();

    let output = env
        .cmd()
        .args(["save", "jobs", input.to_str().unwrap(), "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let saved: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let id = saved["id"].as_str().unwrap().to_string();
    assert_eq!(saved["status"], "진행중");

    env.cmd()
        .args(["get", "jobs", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("SRE"));

    env.cmd().args(["delete", "jobs", &id]).assert().success();

    env.cmd()
        .args(["get", "jobs", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_save_from_stdin() {
    let env = Env::new();
    env.cmd()
        .args(["save", "candidates"])
        .write_stdin(r#"{ "name": "Lee", "email": "lee@example.com", "position": "PM" }"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved"));
}

#[test]
fn test_invalid_status_is_rejected() {
    let env = Env::new();
    env.cmd()
        .args(["save", "candidates"])
        .write_stdin(r#"{ "name": "Lee", "email": "lee@example.com", "position": "PM", "status": "hired" }"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation failed"));
}

#[test]
fn test_backup_restore_after_corruption() {
    let env = Env::new();
    env.cmd().args(["backup", "now"]).assert().success();

    fs::write(
        env.temp.path().join("data").join("wf%3Ajobs.kv"),
        "corrupted",
    )
    .unwrap();

    env.cmd()
        .args(["backup", "restore", "jobs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Restored 3 jobs"));

    env.cmd()
        .args(["backup", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Active tier: durable"));
}

#[test]
fn test_theme_persists() {
    let env = Env::new();
    env.cmd().args(["theme", "dark"]).assert().success();
    env.cmd()
        .args(["theme"])
        .assert()
        .success()
        .stdout(predicate::str::diff("dark\n"));
}

#[test]
fn test_stats_json() {
    let env = Env::new();
    let output = env.cmd().args(["stats", "--json"]).output().unwrap();
    assert!(output.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["totalCandidates"], 5);
    assert_eq!(summary["totalJobs"], 3);
}

#[test]
fn test_config_reads_data_dir_file() {
    let env = Env::new();
    let data = env.temp.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("hiredesk.toml"), "validation_mode = \"strict\"\n").unwrap();

    env.cmd()
        .args(["config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("validation_mode = \"strict\""));
}
