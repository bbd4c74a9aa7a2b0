//! Reporting-line traversal
//!
//! Walks the management tree below a root person and flattens it into
//! `PersonRecord`s. Each report's subtree is explored before the report's own
//! record is emitted, so the output is in depth-first post-order.
//!
//! The walk runs off an explicit frame stack rather than recursion, and keeps
//! a visited set keyed by directory id so cyclic or duplicated directory data
//! cannot loop forever.

use std::collections::HashSet;

use tracing::{info, warn};

use crate::directory::{Directory, DirectoryEntry, TopPerson};
use crate::error::Result;

use super::exclusion::ExclusionRules;
use super::record::{PersonRecord, Superior};

/// Traversal options
#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    /// Accounts to leave out of the result
    pub exclusions: ExclusionRules,

    /// Don't descend into the reports of excluded accounts
    pub prune_excluded: bool,

    /// Stop descending below this depth
    pub max_depth: Option<usize>,
}

/// Counters collected during one walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// People with at least one direct report
    pub managers: usize,
    /// Records in the result, root included
    pub employees: usize,
    /// Reports dropped by the exclusion rules
    pub excluded: usize,
    /// Reports skipped because their id was already seen
    pub duplicates: usize,
    /// People whose reports were not fetched because of `max_depth`
    pub truncated: usize,
}

/// Result of a walk
#[derive(Debug, Clone)]
pub struct Hierarchy {
    pub records: Vec<PersonRecord>,
    pub stats: WalkStats,
}

enum Frame {
    /// Fetch and schedule the reports of `person`
    Expand { person: Superior, depth: usize },
    /// Emit `entry` once its subtree has been explored
    Emit {
        entry: DirectoryEntry,
        superior: Superior,
        department: Option<String>,
        depth: usize,
    },
}

/// State owned by a single walk
#[derive(Default)]
struct WalkState {
    records: Vec<PersonRecord>,
    visited: HashSet<String>,
    stats: WalkStats,
}

/// Walks a directory's reporting lines
pub struct TreeWalker<'a, D: Directory + ?Sized> {
    directory: &'a D,
    options: WalkOptions,
}

impl<'a, D: Directory + ?Sized> TreeWalker<'a, D> {
    pub fn new(directory: &'a D, options: WalkOptions) -> Self {
        Self { directory, options }
    }

    /// Walk everything below `root`
    ///
    /// A failed direct-reports lookup aborts the walk. A failed department
    /// lookup only clears the department for that branch.
    pub async fn walk(&self, root: &TopPerson) -> Result<Hierarchy> {
        let mut state = WalkState::default();
        state.visited.insert(root.entry.id.clone());
        state.records.push(PersonRecord::root(root));

        let mut stack = vec![Frame::Expand {
            person: Superior::from_entry(&root.entry),
            depth: 0,
        }];

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Expand { person, depth } => {
                    self.expand(person, depth, &mut state, &mut stack).await?;
                }
                Frame::Emit {
                    entry,
                    superior,
                    department,
                    depth,
                } => {
                    if self.options.exclusions.is_excluded(&entry) {
                        state.stats.excluded += 1;
                    } else {
                        state
                            .records
                            .push(PersonRecord::report(entry, &superior, department, depth));
                    }
                }
            }
        }

        state.stats.employees = state.records.len();
        Ok(Hierarchy {
            records: state.records,
            stats: state.stats,
        })
    }

    /// Reports carry the department of the manager being expanded, looked up
    /// here rather than inherited from further up.
    async fn expand(
        &self,
        person: Superior,
        depth: usize,
        state: &mut WalkState,
        stack: &mut Vec<Frame>,
    ) -> Result<()> {
        if self.options.max_depth.is_some_and(|max| depth >= max) {
            state.stats.truncated += 1;
            warn!(person_id = %person.id, depth, "Maximum depth reached, not descending further");
            return Ok(());
        }

        let reports = self.directory.direct_reports(&person.id).await?;
        if reports.is_empty() {
            return Ok(());
        }

        let department = match self.directory.department(&person.id).await {
            Ok(department) => department,
            Err(e) => {
                warn!(person_id = %person.id, error = %e, "Department lookup failed, continuing without it");
                None
            }
        };
        state.stats.managers += 1;
        let depth = depth + 1;

        info!(
            manager = %person.name,
            department = %department.as_deref().unwrap_or("-"),
            managers = state.stats.managers,
            employees = state.records.len(),
            "Processing reports"
        );

        let mut scheduled = Vec::with_capacity(reports.len());
        for entry in reports {
            if !state.visited.insert(entry.id.clone()) {
                state.stats.duplicates += 1;
                warn!(
                    person_id = %entry.id,
                    manager_id = %person.id,
                    "Person already visited, skipping (cycle or duplicate in directory data)"
                );
                continue;
            }
            if self.options.prune_excluded && self.options.exclusions.is_excluded(&entry) {
                state.stats.excluded += 1;
                continue;
            }
            scheduled.push(entry);
        }

        // Pushed in reverse so the first report is explored first
        for entry in scheduled.into_iter().rev() {
            let next = Superior::from_entry(&entry);
            stack.push(Frame::Emit {
                entry,
                superior: person.clone(),
                department: department.clone(),
                depth,
            });
            stack.push(Frame::Expand { person: next, depth });
        }

        Ok(())
    }
}
