//! Error types for orgchart
//!
//! Provides structured error handling with:
//! - Numeric error codes for machine parsing
//! - User-friendly messages with suggestions
//! - Exit codes for CLI

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for orgchart operations
pub type Result<T> = std::result::Result<T, Error>;

/// Numeric error codes for machine parsing and documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    // Configuration errors (1xx)
    ConfigNotFound = 100,
    ConfigParseError = 101,
    ConfigValidation = 102,

    // IO errors (2xx)
    IoRead = 200,
    IoWrite = 201,
    IoPermission = 202,
    IoNotFound = 203,

    // Directory fetch errors (3xx)
    FetchFailed = 300,
    FetchTimeout = 301,

    // Directory protocol errors (4xx)
    ResponseMalformed = 400,
    AuthenticationFailed = 403,

    // Lookup errors (5xx)
    PersonNotFound = 500,
    AmbiguousResult = 501,

    // Internal errors (9xx)
    InternalError = 900,
}

impl ErrorCode {
    /// Get the string code (e.g., "E100")
    pub fn as_str(&self) -> String {
        format!("E{}", *self as u16)
    }

    /// Get the exit code for CLI (maps to 1-125 range)
    pub fn exit_code(&self) -> i32 {
        match *self as u16 {
            100..=199 => 10, // Config errors
            200..=299 => 20, // IO errors
            300..=399 => 30, // Fetch errors
            400..=499 => 40, // Protocol errors
            500..=599 => 50, // Lookup errors
            900..=999 => 90, // Internal errors
            _ => 1,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type
#[derive(Error, Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration parse error
    #[error("Failed to parse configuration {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation error
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String, field: Option<String> },

    // ─────────────────────────────────────────────────────────────
    // IO Errors
    // ─────────────────────────────────────────────────────────────

    /// File read error
    #[error("Failed to read file: {path}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File write error
    #[error("Failed to write file: {path}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Directory Errors
    // ─────────────────────────────────────────────────────────────

    /// A directory request failed (network, HTTP status, or service error)
    #[error("Directory request for {subject} failed: {message}")]
    Fetch { subject: String, message: String },

    /// A directory request timed out
    #[error("Directory request for {subject} timed out after {timeout_secs}s")]
    FetchTimeout { subject: String, timeout_secs: u64 },

    /// The directory answered with something we could not interpret
    #[error("Malformed directory response for {subject}: {message}")]
    ResponseMalformed { subject: String, message: String },

    /// The credentials were rejected
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ─────────────────────────────────────────────────────────────
    // Lookup Errors
    // ─────────────────────────────────────────────────────────────

    /// The top-person search returned no matches
    #[error("No person matched '{query}'")]
    NotFound { query: String },

    /// The top-person search returned more than one match
    #[error("Too many results returned for '{query}' ({total})")]
    AmbiguousResult { query: String, total: u64 },

    // ─────────────────────────────────────────────────────────────
    // Internal Errors
    // ─────────────────────────────────────────────────────────────

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    // ─────────────────────────────────────────────────────────────
    // Error Classification
    // ─────────────────────────────────────────────────────────────

    /// Get the numeric error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::ConfigNotFound { .. } => ErrorCode::ConfigNotFound,
            Error::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Error::ConfigValidation { .. } => ErrorCode::ConfigValidation,

            Error::IoRead { .. } => ErrorCode::IoRead,
            Error::IoWrite { .. } => ErrorCode::IoWrite,
            Error::Io(e) => match e.kind() {
                std::io::ErrorKind::NotFound => ErrorCode::IoNotFound,
                std::io::ErrorKind::PermissionDenied => ErrorCode::IoPermission,
                _ => ErrorCode::IoRead,
            },
            Error::Toml(_) => ErrorCode::ConfigParseError,
            Error::Json(_) => ErrorCode::ResponseMalformed,

            Error::Fetch { .. } => ErrorCode::FetchFailed,
            Error::FetchTimeout { .. } => ErrorCode::FetchTimeout,
            Error::ResponseMalformed { .. } => ErrorCode::ResponseMalformed,
            Error::AuthenticationFailed { .. } => ErrorCode::AuthenticationFailed,

            Error::NotFound { .. } => ErrorCode::PersonNotFound,
            Error::AmbiguousResult { .. } => ErrorCode::AmbiguousResult,

            Error::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Whether the error came from talking to the directory service
    pub fn is_fetch(&self) -> bool {
        matches!(
            self,
            Error::Fetch { .. } | Error::FetchTimeout { .. } | Error::ResponseMalformed { .. }
        )
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        self.code().exit_code()
    }

    // ─────────────────────────────────────────────────────────────
    // User-Friendly Messages
    // ─────────────────────────────────────────────────────────────

    /// Get a user-friendly suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::ConfigNotFound { .. } => Some(
                "Run 'orgchart config init' to create a default configuration file."
            ),
            Error::ConfigParse { .. } => Some(
                "Check your configuration file syntax. Run 'orgchart config validate' to see details."
            ),
            Error::ConfigValidation { .. } => Some(
                "Review the configuration file and fix the invalid values."
            ),

            Error::Fetch { .. } | Error::FetchTimeout { .. } => Some(
                "Check your network connection and the directory base URL, then rerun the export."
            ),
            Error::AuthenticationFailed { .. } => Some(
                "Your API token was rejected. Set a fresh one with --token or ORGCHART_TOKEN."
            ),

            Error::NotFound { .. } => Some(
                "Check the spelling of the query, or search by email address instead."
            ),
            Error::AmbiguousResult { .. } => Some(
                "Narrow the query, e.g. use the full email address of the top person."
            ),

            _ => None,
        }
    }

    /// Format the error for terminal display with colors
    pub fn format_for_terminal(&self) -> String {
        let code = self.code();
        let suggestion = self.suggestion();

        let mut output = format!(
            "\x1b[31mError [{}]\x1b[0m: {}\n",
            code.as_str(),
            self
        );

        if let Error::ConfigValidation { field: Some(field), .. } = self {
            output.push_str(&format!("  Field: {}\n", field));
        }

        if let Some(hint) = suggestion {
            output.push_str(&format!("\n\x1b[33mHint\x1b[0m: {}\n", hint));
        }

        output
    }

    /// Format the error for logging (no colors)
    pub fn format_for_log(&self) -> String {
        format!("[{}] {}", self.code().as_str(), self)
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    /// Create a config validation error
    pub fn config_validation(message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a config validation error with field name
    pub fn config_field_invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a fetch error for the given subject (person id or query)
    pub fn fetch(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Fetch {
            subject: subject.into(),
            message: message.into(),
        }
    }

    /// Create a malformed response error
    pub fn malformed(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ResponseMalformed {
            subject: subject.into(),
            message: message.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
