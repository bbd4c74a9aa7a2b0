//! Configuration system tests
//!
//! Tests configuration loading, validation, and environment overrides

use std::fs;
use std::path::PathBuf;

mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Test fixture for configuration testing
struct ConfigFixture {
    _temp_dir: TempDir,
    config_path: PathBuf,
}

impl ConfigFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        Self {
            _temp_dir: temp_dir,
            config_path,
        }
    }

    fn write_config(&self, content: &str) {
        fs::write(&self.config_path, content).unwrap();
    }

    fn path(&self) -> &str {
        self.config_path.to_str().unwrap()
    }
}

fn orgchart_cmd() -> Command {
    let mut cmd = Command::cargo_bin("orgchart").unwrap();
    for var in common::ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

fn validate(fixture: &ConfigFixture) -> assert_cmd::assert::Assert {
    orgchart_cmd()
        .arg("config")
        .arg("validate")
        .arg("--config")
        .arg(fixture.path())
        .assert()
}

// ─────────────────────────────────────────────────────────────────
// Valid Configuration Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_empty_config() {
    let fixture = ConfigFixture::new();
    fixture.write_config("");
    validate(&fixture).success();
}

#[test]
fn test_full_config() {
    let fixture = ConfigFixture::new();
    fixture.write_config(r#"
[directory]
base_url = "https://graph.example.com/v1.0/"
token = "secret-token"
timeout_secs = 10

[exclusions]
names = ["admin", "robot"]
mails = ["noreply"]
prune_subtrees = true

[traversal]
max_depth = 4

[output]
file = "/tmp/org.csv"
format = "json"
include_vendors = true

[logging]
level = "debug"
file = "/tmp/orgchart.log"
max_file_size_mb = 50
max_files = 3
json_format = false
"#);

    validate(&fixture)
        .success()
        .stdout(predicates::str::contains("Configuration is valid"))
        .stdout(predicates::str::contains("no directory token").not());
}

// ─────────────────────────────────────────────────────────────────
// Invalid Configuration Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_invalid_base_url() {
    let fixture = ConfigFixture::new();
    fixture.write_config(r#"
[directory]
base_url = "ftp://graph.example.com"
"#);

    validate(&fixture)
        .failure()
        .code(10)
        .stderr(predicates::str::contains("directory.base_url"));
}

#[test]
fn test_zero_timeout() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[directory]\ntimeout_secs = 0\n");
    validate(&fixture).failure();
}

#[test]
fn test_unknown_format() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[output]\nformat = \"xml\"\n");
    validate(&fixture).failure().stderr(predicates::str::contains("E101"));
}

#[test]
fn test_invalid_log_level() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[logging]\nlevel = \"invalid_level\"\n");
    validate(&fixture).failure();
}

#[test]
fn test_malformed_toml() {
    let fixture = ConfigFixture::new();
    fixture.write_config(r#"
[directory
base_url = "https://graph.example.com"
"#);

    validate(&fixture).failure().stderr(predicates::str::contains("E101"));
}

// ─────────────────────────────────────────────────────────────────
// Config Show Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_config_show_custom() {
    let fixture = ConfigFixture::new();
    fixture.write_config(r#"
[directory]
base_url = "https://custom.example.com/v1.0"
token = "do-not-print-me"

[exclusions]
names = ["robot"]

[traversal]
max_depth = 7
"#);

    orgchart_cmd()
        .arg("config")
        .arg("show")
        .arg("--config")
        .arg(fixture.path())
        .assert()
        .success()
        .stdout(predicates::str::contains("https://custom.example.com/v1.0"))
        .stdout(predicates::str::contains("robot"))
        .stdout(predicates::str::contains("max_depth = 7"))
        .stdout(predicates::str::contains("do-not-print-me").not());
}

// ─────────────────────────────────────────────────────────────────
// Config Init Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_config_init_creates_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nested").join("orgchart.toml");

    orgchart_cmd()
        .arg("config")
        .arg("init")
        .arg("--path")
        .arg(config_path.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicates::str::contains("Configuration file created"));

    assert!(config_path.exists());

    orgchart_cmd()
        .arg("config")
        .arg("validate")
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .assert()
        .success();
}

#[test]
fn test_config_init_refuses_overwrite() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[directory]\n");

    orgchart_cmd()
        .arg("config")
        .arg("init")
        .arg("--path")
        .arg(fixture.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("already exists"));
}

#[test]
fn test_config_init_force_overwrite() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[directory]\ntoken = \"old-token\"\n");

    orgchart_cmd()
        .arg("config")
        .arg("init")
        .arg("--path")
        .arg(fixture.path())
        .arg("--force")
        .assert()
        .success();

    let content = fs::read_to_string(fixture.path()).unwrap();
    assert!(!content.contains("old-token"));
}

// ─────────────────────────────────────────────────────────────────
// Environment Variable Override Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_env_override_base_url() {
    let fixture = ConfigFixture::new();
    fixture.write_config(r#"
[directory]
base_url = "https://file.example.com"
"#);

    orgchart_cmd()
        .arg("config")
        .arg("show")
        .arg("--config")
        .arg(fixture.path())
        .env("ORGCHART_BASE_URL", "https://env.example.com")
        .assert()
        .success()
        .stdout(predicates::str::contains("https://env.example.com"))
        .stdout(predicates::str::contains("file.example.com").not());
}

#[test]
fn test_env_override_exclusions() {
    orgchart_cmd()
        .arg("config")
        .arg("show")
        .env("ORGCHART_NAME_EXCLUSIONS", "robot, ,kiosk")
        .env("ORGCHART_MAX_DEPTH", "12")
        .assert()
        .success()
        .stdout(predicates::str::contains("\"kiosk\""))
        .stdout(predicates::str::contains("max_depth = 12"));
}

// ─────────────────────────────────────────────────────────────────
// Path Expansion Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_tilde_expansion() {
    let fixture = ConfigFixture::new();
    fixture.write_config(r#"
[output]
file = "~/charts/org.csv"
"#);

    let output = orgchart_cmd()
        .arg("config")
        .arg("show")
        .arg("--config")
        .arg(fixture.path())
        .assert()
        .success();

    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("charts/org.csv"));
    assert!(!stdout.contains("file = \"~"));
}
