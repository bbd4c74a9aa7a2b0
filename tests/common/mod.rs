//! Common test utilities and fixtures
//!
//! Builds directory fixture files for end-to-end export runs.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;

/// A small organisation:
///
/// Jane CEO
/// ├── Svc Backup (service account)
/// │   └── Olga Ops
/// ├── Smith, John Jr ("Director")
/// │   └── Vince Vendor (vendor)
/// └── Doe, Ann
pub const SAMPLE_DIRECTORY: &str = r#"{
  "people": [
    {"id": "ceo", "displayName": "CEO, Jane", "userPrincipalName": "jane@example.com",
     "jobTitle": "Chief Executive", "department": "Executive"},
    {"id": "svc", "displayName": "Svc Backup", "userPrincipalName": "backup@example.com",
     "managerId": "ceo", "department": "IT"},
    {"id": "olga", "displayName": "Olga Ops", "userPrincipalName": "olga@example.com",
     "jobTitle": "Operator", "managerId": "svc"},
    {"id": "john", "displayName": "Smith, John Jr", "userPrincipalName": "john@example.com",
     "jobTitle": "\"Director\"", "managerId": "ceo", "department": "Sales"},
    {"id": "vince", "displayName": "Vince Vendor", "userPrincipalName": "vince@example.com",
     "jobTitle": "Vendor - Field Support", "managerId": "john"},
    {"id": "ann", "displayName": "Doe, Ann", "userPrincipalName": "ann@example.com",
     "managerId": "ceo"}
  ]
}"#;

/// Write a fixture file into `dir` and return its path
pub fn write_fixture(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("directory.json");
    fs::write(&path, content).unwrap();
    path
}

/// Every variable the binary reads its settings from
pub const ENV_VARS: &[&str] = &[
    "ORGCHART_BASE_URL",
    "ORGCHART_TOKEN",
    "ORGCHART_TIMEOUT_SECS",
    "ORGCHART_NAME_EXCLUSIONS",
    "ORGCHART_MAIL_EXCLUSIONS",
    "ORGCHART_MAX_DEPTH",
    "ORGCHART_OUTPUT",
    "ORGCHART_INCLUDE_VENDORS",
    "ORGCHART_LOG_LEVEL",
    "ORGCHART_LOG_FILE",
    "ORGCHART_LOG_JSON",
];

/// Get a command for the orgchart binary, isolated from the caller's environment
pub fn orgchart_cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("orgchart").unwrap();
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.env("HOME", home).env("XDG_CONFIG_HOME", home.join(".config"));
    cmd
}
