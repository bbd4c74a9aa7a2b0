//! Service and admin account filtering

use tracing::info;

use crate::directory::DirectoryEntry;

/// Case-insensitive substring rules for leaving accounts out of the chart
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionRules {
    names: Vec<String>,
    mails: Vec<String>,
}

impl ExclusionRules {
    /// Build rules from raw configuration lists
    ///
    /// Patterns are lower-cased once here. Blank patterns would match every
    /// account, so they are dropped.
    pub fn new(names: Vec<String>, mails: Vec<String>) -> Self {
        let clean = |patterns: Vec<String>| -> Vec<String> {
            patterns
                .into_iter()
                .filter(|p| !p.trim().is_empty())
                .map(|p| p.to_lowercase())
                .collect()
        };
        Self {
            names: clean(names),
            mails: clean(mails),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.mails.is_empty()
    }

    /// Whether the entry matches any name or mail rule
    ///
    /// Name rules are checked against the display name, mail rules against
    /// the principal name. A missing field matches as the empty string.
    pub fn is_excluded(&self, entry: &DirectoryEntry) -> bool {
        let name = entry.display_name_or_empty().to_lowercase();
        let mail = entry.principal_name_or_empty().to_lowercase();

        let hit = self
            .names
            .iter()
            .find(|p| name.contains(p.as_str()))
            .or_else(|| self.mails.iter().find(|p| mail.contains(p.as_str())));

        match hit {
            Some(pattern) => {
                info!(
                    name = %entry.display_name_or_empty(),
                    mail = %entry.principal_name_or_empty(),
                    pattern = %pattern,
                    "Skipping suspected service or admin account"
                );
                true
            }
            None => false,
        }
    }
}
