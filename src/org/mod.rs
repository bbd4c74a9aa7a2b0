//! Org hierarchy construction
//!
//! Resolves the top person, walks their reporting lines and cleans up the
//! collected records for export.

mod exclusion;
mod normalize;
mod record;
mod walker;

pub use exclusion::ExclusionRules;
pub use normalize::normalize;
pub use record::NormalizedRecord;
pub use walker::{Hierarchy, TreeWalker, WalkOptions, WalkStats};

use tracing::{debug, info};

use crate::config::OrgConfig;
use crate::directory::Directory;
use crate::error::Result;

impl WalkOptions {
    pub fn from_config(config: &OrgConfig) -> Self {
        Self {
            exclusions: config.exclusions.rules(),
            prune_excluded: config.exclusions.prune_subtrees,
            max_depth: match config.traversal.max_depth {
                0 => None,
                n => Some(n),
            },
        }
    }
}

/// Find the person matching `query` and collect everyone below them
pub async fn build_hierarchy<D: Directory + ?Sized>(
    directory: &D,
    query: &str,
    options: WalkOptions,
) -> Result<Hierarchy> {
    if options.exclusions.is_empty() {
        debug!("No exclusion rules configured");
    }

    let top = directory.search_top_person(query).await?;
    info!(
        directory = directory.name(),
        name = %top.entry.display_name_or_empty(),
        mail = %top.entry.principal_name_or_empty(),
        department = %top.department.as_deref().unwrap_or("-"),
        "Resolved top person"
    );

    let hierarchy = TreeWalker::new(directory, options).walk(&top).await?;
    let stats: WalkStats = hierarchy.stats;
    info!(
        managers = stats.managers,
        employees = stats.employees,
        excluded = stats.excluded,
        duplicates = stats.duplicates,
        truncated = stats.truncated,
        "Done querying"
    );

    Ok(hierarchy)
}
