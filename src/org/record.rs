//! Person records produced by the walk and by normalization

use serde::{Deserialize, Serialize};

use crate::directory::{DirectoryEntry, TopPerson};

/// One retained directory entry, as collected during the walk
///
/// `manager` and `manager_id` describe the person whose reports were being
/// expanded when this record was emitted. Both are `None` only for the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonRecord {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub title: Option<String>,
    pub manager: Option<String>,
    pub manager_id: Option<String>,
    pub department: Option<String>,
    pub depth: usize,
}

/// The person whose direct reports are being expanded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Superior {
    pub id: String,
    /// Label written as the manager of each report; never empty
    pub name: String,
}

impl Superior {
    /// Display name, falling back to the principal name and then the id
    pub fn from_entry(entry: &DirectoryEntry) -> Self {
        let name = [&entry.display_name, &entry.user_principal_name]
            .into_iter()
            .flatten()
            .find(|v| !v.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| entry.id.clone());
        Self {
            id: entry.id.clone(),
            name,
        }
    }
}

impl PersonRecord {
    /// Record for the top of the chart
    pub fn root(top: &TopPerson) -> Self {
        Self {
            id: top.entry.id.clone(),
            name: top.entry.display_name.clone(),
            email: top.entry.user_principal_name.clone(),
            title: top.entry.job_title.clone(),
            manager: None,
            manager_id: None,
            department: top.department.clone(),
            depth: 0,
        }
    }

    /// Record for a direct report of `superior`
    pub fn report(
        entry: DirectoryEntry,
        superior: &Superior,
        department: Option<String>,
        depth: usize,
    ) -> Self {
        Self {
            id: entry.id,
            name: entry.display_name,
            email: entry.user_principal_name,
            title: entry.job_title,
            manager: Some(superior.name.clone()),
            manager_id: Some(superior.id.clone()),
            department,
            depth,
        }
    }

    pub fn is_root(&self) -> bool {
        self.depth == 0 && self.manager_id.is_none()
    }
}

/// A record after text cleanup, ready for export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub name: Option<String>,
    pub email: Option<String>,
    pub title: Option<String>,
    pub manager: Option<String>,
}

/// Read access to the free-text fields the normalizer rewrites
pub trait TextFields {
    fn name(&self) -> Option<&str>;
    fn email(&self) -> Option<&str>;
    fn title(&self) -> Option<&str>;
    fn manager(&self) -> Option<&str>;
}

impl TextFields for PersonRecord {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
    fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
    fn manager(&self) -> Option<&str> {
        self.manager.as_deref()
    }
}

impl TextFields for NormalizedRecord {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
    fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
    fn manager(&self) -> Option<&str> {
        self.manager.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, name: &str) -> DirectoryEntry {
        DirectoryEntry {
            id: id.to_string(),
            display_name: Some(name.to_string()),
            user_principal_name: Some(format!("{}@example.com", id)),
            job_title: None,
        }
    }

    #[test]
    fn test_root_record() {
        let top = TopPerson {
            entry: entry("ceo", "CEO, Jane"),
            department: Some("Exec".to_string()),
        };
        let record = PersonRecord::root(&top);

        assert!(record.is_root());
        assert_eq!(record.depth, 0);
        assert_eq!(record.manager, None);
        assert_eq!(record.department.as_deref(), Some("Exec"));
    }

    #[test]
    fn test_report_links_to_superior() {
        let boss = Superior::from_entry(&entry("ceo", "CEO, Jane"));
        let record = PersonRecord::report(entry("a", "Able, Ann"), &boss, None, 1);

        assert!(!record.is_root());
        assert_eq!(record.manager.as_deref(), Some("CEO, Jane"));
        assert_eq!(record.manager_id.as_deref(), Some("ceo"));
        assert_eq!(record.email.as_deref(), Some("a@example.com"));
        assert_eq!(record.depth, 1);
    }

    #[test]
    fn test_superior_name_falls_back() {
        let mut nameless = entry("a", "");
        nameless.display_name = None;
        assert_eq!(Superior::from_entry(&nameless).name, "a@example.com");

        nameless.user_principal_name = Some("  ".to_string());
        assert_eq!(Superior::from_entry(&nameless).name, "a");
    }
}
