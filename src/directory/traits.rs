//! Directory trait definitions
//!
//! Defines the `Directory` trait every directory source implements, plus the
//! entry types it hands to the tree walker.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

// ─────────────────────────────────────────────────────────────────
// Directory Entries
// ─────────────────────────────────────────────────────────────────

/// A person as returned by a direct-reports listing
///
/// Field names follow the Graph user resource so listings deserialize as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    /// Stable directory identifier
    pub id: String,

    /// Display name, often "Last, First"
    #[serde(default)]
    pub display_name: Option<String>,

    /// User principal name (sign-in address)
    #[serde(default)]
    pub user_principal_name: Option<String>,

    /// Job title
    #[serde(default)]
    pub job_title: Option<String>,
}

impl DirectoryEntry {
    /// Display name, or an empty string when the directory has none
    pub fn display_name_or_empty(&self) -> &str {
        self.display_name.as_deref().unwrap_or("")
    }

    /// Principal name, or an empty string when the directory has none
    pub fn principal_name_or_empty(&self) -> &str {
        self.user_principal_name.as_deref().unwrap_or("")
    }
}

/// The person a chart starts from, as resolved by a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopPerson {
    pub entry: DirectoryEntry,
    pub department: Option<String>,
}

// ─────────────────────────────────────────────────────────────────
// Directory Trait
// ─────────────────────────────────────────────────────────────────

/// Source of reporting-line data
///
/// Every call is awaited to completion before the walker issues the next one.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Short name for log output (e.g., "graph", "fixture")
    fn name(&self) -> &'static str;

    /// Check credentials before any query is made
    async fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Resolve a free-text query to exactly one person
    ///
    /// Fails with `Error::NotFound` on zero matches and
    /// `Error::AmbiguousResult` on more than one.
    async fn search_top_person(&self, query: &str) -> Result<TopPerson>;

    /// List the direct reports of a person, in directory order
    async fn direct_reports(&self, id: &str) -> Result<Vec<DirectoryEntry>>;

    /// Look up a person's department
    async fn department(&self, id: &str) -> Result<Option<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_deserializes_graph_user() {
        let json = r##"{
            "@odata.type": "#microsoft.graph.user",
            "id": "7f1c",
            "displayName": "Doe, Jane",
            "userPrincipalName": "jane.doe@example.com",
            "jobTitle": null
        }"##;

        let entry: DirectoryEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, "7f1c");
        assert_eq!(entry.display_name.as_deref(), Some("Doe, Jane"));
        assert_eq!(entry.user_principal_name.as_deref(), Some("jane.doe@example.com"));
        assert!(entry.job_title.is_none());
    }

    #[test]
    fn test_missing_fields_read_as_empty() {
        let entry: DirectoryEntry = serde_json::from_str(r#"{"id": "x"}"#).unwrap();
        assert_eq!(entry.display_name_or_empty(), "");
        assert_eq!(entry.principal_name_or_empty(), "");
    }
}
