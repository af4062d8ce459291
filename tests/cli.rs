//! End-to-end tests of the `morty` binary
//!
//! Every test runs against fresh temporary data and public directories, and
//! points the character API at a closed local port so nothing leaves the host.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const OFFLINE_API: &str = "http://127.0.0.1:9/api/";

struct Env {
    data: TempDir,
    public: TempDir,
}

impl Env {
    fn new() -> Self {
        let env = Self {
            data: TempDir::new().unwrap(),
            public: TempDir::new().unwrap(),
        };
        env.morty()
            .args(["settings", "set", "--api-base-url", OFFLINE_API])
            .assert()
            .success();
        env
    }

    fn morty(&self) -> Command {
        let mut cmd = Command::cargo_bin("morty").unwrap();
        cmd.env("MORTY_DATA_DIR", self.data.path())
            .env("MORTY_PUBLIC_DIR", self.public.path())
            .env_remove("MORTY_LOG")
            .env_remove("RUST_LOG")
            .env_remove("HTTP_PROXY")
            .env_remove("HTTPS_PROXY")
            .env_remove("http_proxy")
            .env_remove("https_proxy")
            .env_remove("ALL_PROXY")
            .env_remove("all_proxy");
        cmd
    }

    fn public_file(&self, name: &str) -> std::path::PathBuf {
        self.public.path().join(name)
    }

    fn private_file(&self, name: &str) -> std::path::PathBuf {
        self.data.path().join("backups").join(format!("backup_{}", name))
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn config_shows_resolved_paths() {
    let env = Env::new();
    env.morty()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains(env.data.path().to_string_lossy().to_string()))
        .stdout(predicate::str::contains("backup_data.txt"));
}

#[test]
fn settings_set_normalizes_filename_and_persists() {
    let env = Env::new();
    env.morty()
        .args(["settings", "set", "--backup-filename", "  my_characters ", "--font-size", "18"])
        .assert()
        .success();

    env.morty()
        .args(["settings", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("my_characters.txt"))
        .stdout(predicate::str::contains("18"));
}

#[test]
fn settings_rejects_invalid_values() {
    let env = Env::new();
    env.morty()
        .args(["settings", "set", "--font-size", "99"])
        .assert()
        .failure();
    env.morty()
        .args(["settings", "set", "--backup-filename", "   "])
        .assert()
        .failure();
    env.morty()
        .args(["settings", "set", "--api-base-url", "ftp://x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("http(s)"));

    env.morty()
        .args(["settings", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("backup_data.txt"))
        .stdout(predicate::str::contains("14"))
        .stdout(predicate::str::contains(OFFLINE_API));
}

#[test]
fn create_backup_delete_restore_cycle() {
    let env = Env::new();
    let public = env.public_file("backup_data.txt");
    let private = env.private_file("backup_data.txt");

    env.morty().args(["file", "create"]).assert().success();
    let written = read(&public);
    assert!(written.starts_with("=== Rick and Morty Characters Data ==="));
    assert!(written.contains("Total characters: 0"));

    env.morty().args(["file", "delete"]).assert().success();
    assert!(!public.exists());
    assert_eq!(read(&private), written);

    env.morty()
        .args(["file", "info"])
        .assert()
        .success()
        .stdout(predicate::str::contains("public copy: not found"))
        .stdout(predicate::str::contains("private copy: backup_backup_data.txt"));

    env.morty().args(["file", "restore"]).assert().success();
    assert_eq!(read(&public), written);
    assert!(!private.exists());

    // A restore is single-use
    env.morty().args(["file", "restore"]).assert().failure();
}

#[test]
fn backup_without_public_file_fails() {
    let env = Env::new();
    env.morty().args(["file", "backup"]).assert().failure();
    env.morty().args(["file", "delete"]).assert().failure();
    assert!(!env.private_file("backup_data.txt").exists());
}

#[test]
fn name_override_and_formats() {
    let env = Env::new();
    env.morty()
        .args(["file", "create", "--format", "json", "--name", "export"])
        .assert()
        .success();

    let content = read(&env.public_file("export.txt"));
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed["total"], 0);

    env.morty()
        .args(["file", "backup", "--name", "export.txt"])
        .assert()
        .success();
    assert!(env.private_file("export.txt").exists());

    env.morty()
        .args(["file", "delete-cache", "--name", "export"])
        .assert()
        .success();
    assert!(!env.private_file("export.txt").exists());

    env.morty()
        .args(["file", "create", "--format", "xml"])
        .assert()
        .failure();
}

#[test]
fn offline_fetch_fails_and_is_logged() {
    let env = Env::new();
    env.morty().args(["characters", "list"]).assert().failure();

    env.morty()
        .args(["log", "--count", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FETCH_PAGE 1 FAILED"))
        .stdout(predicate::str::contains("SAVE_SETTINGS settings ok"));
}

#[test]
fn show_missing_character_fails() {
    let env = Env::new();
    env.morty()
        .args(["characters", "show", "42"])
        .assert()
        .failure();
}

#[test]
fn log_is_empty_on_fresh_install() {
    let data = TempDir::new().unwrap();
    Command::cargo_bin("morty")
        .unwrap()
        .env("MORTY_DATA_DIR", data.path())
        .env("MORTY_PUBLIC_DIR", data.path().join("public"))
        .arg("log")
        .assert()
        .success()
        .stdout(predicate::str::contains("No activity recorded yet."));
}
