//! Build output aggregation into a unified tree.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::Result;
use crate::fsops::copy_tree;
use crate::project::Project;

/// What one aggregation pass did.
#[derive(Debug, Clone, Default)]
pub struct CollectSummary {
    /// Projects whose output was copied, in pass order.
    pub collected: Vec<String>,
    /// Projects without an output directory, skipped with a warning.
    pub skipped: Vec<String>,
    pub files: u64,
}

/// Copies each project's build output contents into one unified destination.
///
/// The destination is recreated fresh at the start of every pass, so two
/// passes over unchanged outputs produce identical trees.
pub struct Collector {
    collect_dir: PathBuf,
    output_dir: String,
}

impl Collector {
    pub fn new(collect_dir: impl Into<PathBuf>, output_dir: impl Into<String>) -> Self {
        Self {
            collect_dir: collect_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn destination(&self) -> &PathBuf {
        &self.collect_dir
    }

    pub fn collect<'p>(
        &self,
        projects: impl IntoIterator<Item = &'p Project>,
    ) -> Result<CollectSummary> {
        if self.collect_dir.exists() {
            std::fs::remove_dir_all(&self.collect_dir)?;
        }
        std::fs::create_dir_all(&self.collect_dir)?;

        let mut summary = CollectSummary::default();
        for project in projects {
            let output = project.path.join(&self.output_dir);
            if !output.is_dir() {
                warn!(project = %project.name, "no '{}' directory, skipping", self.output_dir);
                summary.skipped.push(project.name.clone());
                continue;
            }
            summary.files += copy_tree(&output, &self.collect_dir)?;
            summary.collected.push(project.name.clone());
            info!(project = %project.name, "collected build output");
        }
        Ok(summary)
    }
}
