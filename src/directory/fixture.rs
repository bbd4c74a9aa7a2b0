//! In-memory directory
//!
//! Serves a fixed set of people, either built in code or loaded from a JSON
//! fixture file (`export --fixture`). Lookups can be told to fail so error
//! paths can be exercised without a network.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::{Directory, DirectoryEntry, TopPerson};

// ─────────────────────────────────────────────────────────────────
// Fixture Format
// ─────────────────────────────────────────────────────────────────

/// One person in a fixture file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixturePerson {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub user_principal_name: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    /// Id of the person this one reports to
    #[serde(default)]
    pub manager_id: Option<String>,
}

#[cfg(test)]
impl FixturePerson {
    pub fn new(id: &str, display_name: &str, user_principal_name: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: Some(display_name.to_string()),
            user_principal_name: Some(user_principal_name.to_string()),
            job_title: None,
            department: None,
            manager_id: None,
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.job_title = Some(title.to_string());
        self
    }

    pub fn department(mut self, department: &str) -> Self {
        self.department = Some(department.to_string());
        self
    }

    pub fn reports_to(mut self, manager_id: &str) -> Self {
        self.manager_id = Some(manager_id.to_string());
        self
    }
}

impl FixturePerson {
    fn entry(&self) -> DirectoryEntry {
        DirectoryEntry {
            id: self.id.clone(),
            display_name: self.display_name.clone(),
            user_principal_name: self.user_principal_name.clone(),
            job_title: self.job_title.clone(),
        }
    }

    fn matches(&self, query: &str) -> bool {
        let contains = |field: &Option<String>| {
            field
                .as_deref()
                .is_some_and(|v| v.to_lowercase().contains(query))
        };
        contains(&self.display_name) || contains(&self.user_principal_name)
    }
}

/// Top-level fixture document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectoryFixture {
    pub people: Vec<FixturePerson>,
}

// ─────────────────────────────────────────────────────────────────
// Static Directory
// ─────────────────────────────────────────────────────────────────

/// Track method call counts for verification
#[derive(Debug, Default)]
struct CallCounts {
    search: u32,
    direct_reports: u32,
    department: u32,
}

/// Directory answering from an in-memory list of people
pub struct StaticDirectory {
    people: Vec<FixturePerson>,
    fail_reports: HashSet<String>,
    fail_departments: HashSet<String>,
    call_counts: RwLock<CallCounts>,
}

impl StaticDirectory {
    /// Create a directory over the given people; list order is report order
    pub fn new(people: Vec<FixturePerson>) -> Self {
        Self {
            people,
            fail_reports: HashSet::new(),
            fail_departments: HashSet::new(),
            call_counts: RwLock::new(CallCounts::default()),
        }
    }

    /// Parse a JSON fixture document
    pub fn from_json(json: &str) -> Result<Self> {
        let fixture: DirectoryFixture = serde_json::from_str(json)?;
        Ok(Self::new(fixture.people))
    }

    /// Load a JSON fixture file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::IoRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let directory = Self::from_json(&content)?;
        debug!(path = %path.display(), people = directory.people.len(), "Fixture directory loaded");
        Ok(directory)
    }

    fn person(&self, id: &str) -> Result<&FixturePerson> {
        self.people
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::fetch(id, "no such person in fixture"))
    }
}

#[cfg(test)]
impl StaticDirectory {
    /// Make direct-report lookups for `id` fail
    pub fn fail_reports_for(mut self, id: &str) -> Self {
        self.fail_reports.insert(id.to_string());
        self
    }

    /// Make department lookups for `id` fail
    pub fn fail_department_for(mut self, id: &str) -> Self {
        self.fail_departments.insert(id.to_string());
        self
    }

    /// Get the number of times a method was called
    pub fn call_count(&self, method: &str) -> u32 {
        let counts = self.call_counts.read();
        match method {
            "search_top_person" => counts.search,
            "direct_reports" => counts.direct_reports,
            "department" => counts.department,
            _ => 0,
        }
    }
}

#[async_trait]
impl Directory for StaticDirectory {
    fn name(&self) -> &'static str {
        "fixture"
    }

    async fn search_top_person(&self, query: &str) -> Result<TopPerson> {
        self.call_counts.write().search += 1;

        let needle = query.trim().to_lowercase();
        let hits: Vec<&FixturePerson> = self.people.iter().filter(|p| p.matches(&needle)).collect();

        match hits.as_slice() {
            [] => Err(Error::NotFound { query: query.to_string() }),
            [person] => Ok(TopPerson {
                entry: person.entry(),
                department: person.department.clone(),
            }),
            many => Err(Error::AmbiguousResult {
                query: query.to_string(),
                total: many.len() as u64,
            }),
        }
    }

    async fn direct_reports(&self, id: &str) -> Result<Vec<DirectoryEntry>> {
        self.call_counts.write().direct_reports += 1;

        if self.fail_reports.contains(id) {
            return Err(Error::fetch(id, "simulated directory failure"));
        }
        self.person(id)?;

        Ok(self
            .people
            .iter()
            .filter(|p| p.manager_id.as_deref() == Some(id))
            .map(FixturePerson::entry)
            .collect())
    }

    async fn department(&self, id: &str) -> Result<Option<String>> {
        self.call_counts.write().department += 1;

        if self.fail_departments.contains(id) {
            return Err(Error::fetch(id, "simulated department failure"));
        }
        Ok(self.person(id)?.department.clone())
    }
}
