//! Configuration system for orgchart
//!
//! Supports multiple configuration sources with the following precedence (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (ORGCHART_* prefix)
//! 3. Configuration file (TOML)
//! 4. Default values

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::org::ExclusionRules;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrgConfig {
    /// Directory service connection settings
    pub directory: DirectorySettings,

    /// Accounts to leave out of the chart
    pub exclusions: ExclusionSettings,

    /// Traversal limits
    pub traversal: TraversalSettings,

    /// Export settings
    pub output: OutputSettings,

    /// Logging configuration
    pub logging: LoggingSettings,

    /// File the settings were read from, if any
    #[serde(skip)]
    pub loaded_from: Option<PathBuf>,
}

/// Directory service connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorySettings {
    /// API base URL
    pub base_url: String,

    /// Bearer token for the directory API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Exclusion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExclusionSettings {
    /// Case-insensitive substrings matched against display names
    pub names: Vec<String>,

    /// Case-insensitive substrings matched against principal names
    pub mails: Vec<String>,

    /// Skip the reports of excluded accounts as well
    pub prune_subtrees: bool,
}

/// Traversal settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalSettings {
    /// Maximum management depth to descend (0 = unlimited)
    pub max_depth: usize,
}

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// draw.io CSV import
    #[default]
    Drawio,
    /// JSON array of records
    Json,
}

/// Export settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Output file path (stdout if unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Output format
    pub format: OutputFormat,

    /// Keep people whose title mentions "vendor"
    pub include_vendors: bool,

    /// Custom draw.io CSV header template
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Log file path (empty = no file logging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Maximum log file size in MB before rotation
    pub max_file_size_mb: u64,

    /// Number of rotated log files to keep
    pub max_files: u32,

    /// Enable JSON formatted logging
    pub json_format: bool,
}

// Default implementations

impl Default for DirectorySettings {
    fn default() -> Self {
        Self {
            base_url: "https://graph.microsoft.com/v1.0".to_string(),
            token: None,
            timeout_secs: 30,
        }
    }
}

impl Default for ExclusionSettings {
    fn default() -> Self {
        Self {
            names: vec![
                "admin".to_string(),
                "svc".to_string(),
                "service".to_string(),
                "test".to_string(),
            ],
            mails: vec!["admin".to_string(), "svc".to_string()],
            prune_subtrees: false,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            max_file_size_mb: 100,
            max_files: 5,
            json_format: false,
        }
    }
}

impl ExclusionSettings {
    /// Build the matcher used by the tree walker
    pub fn rules(&self) -> ExclusionRules {
        ExclusionRules::new(self.names.clone(), self.mails.clone())
    }
}

impl OrgConfig {
    /// Load configuration from file with environment variable overrides
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = Self::default();

        // 1. Load from config file if it exists
        if let Some(path) = Self::find_config_file(config_path)? {
            debug!(path = %path.display(), "Loading configuration file");
            let content = fs::read_to_string(&path).map_err(|e| Error::IoRead {
                path: path.clone(),
                source: e,
            })?;
            config = toml::from_str(&content).map_err(|e| Error::ConfigParse {
                path: path.clone(),
                source: e,
            })?;
            config.loaded_from = Some(path);
        }

        // 2. Apply environment variable overrides
        config.apply_env_overrides();

        // 3. Expand paths
        config.expand_paths();

        // 4. Validate
        config.validate()?;

        Ok(config)
    }

    /// Find the configuration file to use
    fn find_config_file(explicit_path: Option<&str>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit_path {
            let path = PathBuf::from(expand_path(path));
            if path.exists() {
                return Ok(Some(path));
            }
            return Err(Error::ConfigNotFound { path });
        }

        let search_paths = [
            PathBuf::from("orgchart.toml"),
            dirs::config_dir()
                .map(|p| p.join("orgchart").join("config.toml"))
                .unwrap_or_default(),
            dirs::home_dir()
                .map(|p| p.join(".orgchart").join("config.toml"))
                .unwrap_or_default(),
            PathBuf::from("/etc/orgchart/config.toml"),
        ];

        for path in &search_paths {
            if !path.as_os_str().is_empty() && path.exists() {
                debug!(path = %path.display(), "Found configuration file");
                return Ok(Some(path.clone()));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(None)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // Directory settings
        if let Ok(val) = std::env::var("ORGCHART_BASE_URL") {
            self.directory.base_url = val;
        }
        if let Ok(val) = std::env::var("ORGCHART_TOKEN") {
            self.directory.token = Some(val);
        }
        if let Ok(val) = std::env::var("ORGCHART_TIMEOUT_SECS") {
            if let Ok(n) = val.parse() {
                self.directory.timeout_secs = n;
            }
        }

        // Exclusions
        if let Ok(val) = std::env::var("ORGCHART_NAME_EXCLUSIONS") {
            self.exclusions.names = split_list(&val);
        }
        if let Ok(val) = std::env::var("ORGCHART_MAIL_EXCLUSIONS") {
            self.exclusions.mails = split_list(&val);
        }

        // Traversal
        if let Ok(val) = std::env::var("ORGCHART_MAX_DEPTH") {
            if let Ok(n) = val.parse() {
                self.traversal.max_depth = n;
            }
        }

        // Output
        if let Ok(val) = std::env::var("ORGCHART_OUTPUT") {
            self.output.file = Some(val);
        }
        if let Ok(val) = std::env::var("ORGCHART_INCLUDE_VENDORS") {
            self.output.include_vendors = parse_bool(&val);
        }

        // Logging settings
        if let Ok(val) = std::env::var("ORGCHART_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("ORGCHART_LOG_FILE") {
            self.logging.file = Some(val);
        }
        if let Ok(val) = std::env::var("ORGCHART_LOG_JSON") {
            self.logging.json_format = parse_bool(&val);
        }
    }

    /// Expand ~ and other path variables
    fn expand_paths(&mut self) {
        if let Some(ref file) = self.output.file {
            self.output.file = Some(expand_path(file));
        }
        if let Some(ref template) = self.output.template {
            self.output.template = Some(expand_path(template));
        }
        if let Some(ref file) = self.logging.file {
            self.logging.file = Some(expand_path(file));
        }
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.directory.base_url).map_err(|e| {
            Error::config_field_invalid(
                "directory.base_url",
                format!("Invalid directory URL '{}': {}", self.directory.base_url, e),
            )
        })?;
        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(Error::config_field_invalid(
                "directory.base_url",
                "Directory URL must start with http:// or https://",
            ));
        }

        if self.directory.timeout_secs == 0 {
            return Err(Error::config_field_invalid(
                "directory.timeout_secs",
                "timeout_secs must be greater than 0",
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::config_field_invalid(
                "logging.level",
                format!(
                    "Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_levels.join(", ")
                ),
            ));
        }

        Ok(())
    }

    /// Copy of the configuration that is safe to print
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.directory.token.is_some() {
            config.directory.token = Some("********".to_string());
        }
        config
    }
}

fn parse_bool(val: &str) -> bool {
    val.to_lowercase() == "true" || val == "1"
}

/// Split a comma separated list, dropping blank entries
fn split_list(val: &str) -> Vec<String> {
    val.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Expand ~ and environment variables in paths
fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .unwrap_or_else(|_| std::borrow::Cow::Borrowed(path))
        .into_owned()
}

/// Initialize a new configuration file
pub fn init_config(path: Option<&str>, force: bool) -> Result<()> {
    let config_path = path
        .map(|p| PathBuf::from(expand_path(p)))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".orgchart")
                .join("config.toml")
        });

    if config_path.exists() && !force {
        return Err(Error::config_validation(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::IoWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(&config_path, generate_default_config()).map_err(|e| Error::IoWrite {
        path: config_path.clone(),
        source: e,
    })?;

    println!("Configuration file created: {}", config_path.display());
    Ok(())
}

/// Generate default configuration content with comments
fn generate_default_config() -> String {
    r#"# orgchart configuration

[directory]
# Directory API base URL
base_url = "https://graph.microsoft.com/v1.0"

# Bearer token (prefer ORGCHART_TOKEN or --token over storing it here)
# token = "eyJ0eXAi..."

# Request timeout in seconds
timeout_secs = 30

[exclusions]
# Accounts whose display name contains any of these (case-insensitive) are skipped
names = ["admin", "svc", "service", "test"]

# Accounts whose principal name contains any of these (case-insensitive) are skipped
mails = ["admin", "svc"]

# Also skip everyone reporting to an excluded account
prune_subtrees = false

[traversal]
# Maximum management depth to descend (0 = unlimited)
max_depth = 0

[output]
# Output file (comment out to write to stdout)
# file = "org.csv"

# drawio or json
format = "drawio"

# Keep people whose job title mentions "vendor"
include_vendors = false

# Custom draw.io CSV header template
# template = "~/.orgchart/drawio_template.txt"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log file path (comment out to disable file logging)
# file = "~/.orgchart/logs/orgchart.log"

# Maximum log file size in MB before rotation
max_file_size_mb = 100

# Number of rotated log files to keep
max_files = 5

# Enable JSON formatted logging
json_format = false
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_default_config() {
        let config = OrgConfig::default();
        assert_eq!(config.directory.base_url, "https://graph.microsoft.com/v1.0");
        assert_eq!(config.directory.timeout_secs, 30);
        assert_eq!(config.output.format, OutputFormat::Drawio);
        assert!(!config.output.include_vendors);
        assert!(!config.exclusions.prune_subtrees);
        assert_eq!(config.traversal.max_depth, 0);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_records_source_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("orgchart.toml");
        fs::write(&path, "[traversal]\nmax_depth = 3\n").unwrap();

        let config = OrgConfig::load(path.to_str()).unwrap();
        assert_eq!(config.loaded_from.as_deref(), Some(path.as_path()));

        let shown = toml::to_string(&config).unwrap();
        assert!(!shown.contains("loaded_from"));
    }

    #[test]
    fn test_env_override() {
        env::set_var("ORGCHART_BASE_URL", "https://graph.example.com/beta");
        env::set_var("ORGCHART_NAME_EXCLUSIONS", "bot, ,robot");
        env::set_var("ORGCHART_MAX_DEPTH", "7");

        let mut config = OrgConfig::default();
        config.apply_env_overrides();

        assert_eq!(config.directory.base_url, "https://graph.example.com/beta");
        assert_eq!(config.exclusions.names, vec!["bot", "robot"]);
        assert_eq!(config.traversal.max_depth, 7);

        env::remove_var("ORGCHART_BASE_URL");
        env::remove_var("ORGCHART_NAME_EXCLUSIONS");
        env::remove_var("ORGCHART_MAX_DEPTH");
    }

    #[test]
    fn test_validation_invalid_url() {
        let mut config = OrgConfig::default();
        config.directory.base_url = "ftp://graph.example.com".to_string();
        assert!(config.validate().is_err());

        config.directory.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let mut config = OrgConfig::default();
        config.directory.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_log_level() {
        let mut config = OrgConfig::default();
        config.logging.level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(OrgConfig::default().validate().is_ok());
    }

    #[test]
    fn test_redacted_hides_token() {
        let mut config = OrgConfig::default();
        config.directory.token = Some("secret-token".to_string());

        let shown = toml::to_string(&config.redacted()).unwrap();
        assert!(!shown.contains("secret-token"));
        assert_eq!(config.directory.token.as_deref(), Some("secret-token"));
    }

    #[test]
    fn test_generated_default_config_parses() {
        let config: OrgConfig = toml::from_str(&generate_default_config()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.exclusions.mails, vec!["admin", "svc"]);
    }

    #[test]
    fn test_parse_config_file() {
        let config_str = r#"
[directory]
base_url = "https://graph.example.com/v1.0"
timeout_secs = 5

[exclusions]
names = ["bot"]
mails = []
prune_subtrees = true

[output]
file = "/tmp/org.csv"
format = "json"
include_vendors = true

[logging]
level = "debug"
"#;

        let config: OrgConfig = toml::from_str(config_str).unwrap();

        assert_eq!(config.directory.base_url, "https://graph.example.com/v1.0");
        assert_eq!(config.directory.timeout_secs, 5);
        assert_eq!(config.exclusions.names, vec!["bot"]);
        assert!(config.exclusions.mails.is_empty());
        assert!(config.exclusions.prune_subtrees);
        assert_eq!(config.output.file.as_deref(), Some("/tmp/org.csv"));
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.include_vendors);
        assert_eq!(config.logging.level, "debug");
    }
}
