//! Shared-library output propagation into platform dependency caches.

use std::path::PathBuf;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::config::PropagationConfig;
use crate::error::{Error, Result};
use crate::fsops::{copy_tree, count_files};
use crate::project::Project;

/// Result of one platform's propagation.
#[derive(Debug)]
pub struct PropagationOutcome {
    pub platform: String,
    pub result: Result<()>,
}

/// Replaces each platform's cached copy of the shared library output with
/// the freshly built tree.
///
/// The replace stages into a temporary sibling directory and rename-swaps
/// into place; where rename is not possible it falls back to remove-then-copy
/// with a file-count verification afterwards. Platforms touch only their own
/// directories, so they propagate concurrently without locking.
pub struct Propagator {
    /// Absolute path of the shared library subtree platforms consume.
    source: PathBuf,
    /// Cache location relative to each platform directory.
    target_rel: PathBuf,
}

impl Propagator {
    pub fn new(shared: &Project, config: &PropagationConfig) -> Self {
        Self {
            source: shared.path.join(&config.source),
            target_rel: config.target.clone(),
        }
    }

    /// Propagates to every platform concurrently. Failures are per-platform;
    /// one bad platform never aborts its siblings.
    pub fn propagate_all(&self, platforms: &[&Project]) -> Vec<PropagationOutcome> {
        let mut outcomes: Vec<PropagationOutcome> = platforms
            .par_iter()
            .map(|platform| {
                let result = self.propagate_one(platform);
                if let Err(e) = &result {
                    warn!(platform = %platform.name, "propagation failed: {}", e);
                }
                PropagationOutcome {
                    platform: platform.name.clone(),
                    result,
                }
            })
            .collect();
        outcomes.sort_by(|a, b| a.platform.cmp(&b.platform));
        outcomes
    }

    fn propagate_one(&self, platform: &Project) -> Result<()> {
        if !self.source.is_dir() {
            return Err(Error::Propagation {
                name: platform.name.clone(),
                message: format!("shared output missing: {}", self.source.display()),
            });
        }

        let target = platform.path.join(&self.target_rel);
        let parent = target.parent().ok_or_else(|| Error::Propagation {
            name: platform.name.clone(),
            message: format!("target has no parent: {}", target.display()),
        })?;
        std::fs::create_dir_all(parent).map_err(|e| self.fail(platform, &e))?;

        // Stage next to the target so the final rename stays on one filesystem.
        let stage = tempfile::Builder::new()
            .prefix(".buildhive-stage-")
            .tempdir_in(parent)
            .map_err(|e| self.fail(platform, &e))?;
        let expected = copy_tree(&self.source, stage.path())?;
        let staged = stage.into_path();

        if target.exists() {
            std::fs::remove_dir_all(&target).map_err(|e| self.fail(platform, &e))?;
        }

        match std::fs::rename(&staged, &target) {
            Ok(()) => {
                info!(platform = %platform.name, "propagated shared output (swap)");
                Ok(())
            }
            Err(rename_err) => {
                // Cross-device or unsupported rename: copy and verify instead.
                warn!(
                    platform = %platform.name,
                    "rename-swap unavailable ({}), copying", rename_err
                );
                let copied = copy_tree(&staged, &target)?;
                let _ = std::fs::remove_dir_all(&staged);
                if copied != expected || count_files(&target) != expected {
                    return Err(Error::Propagation {
                        name: platform.name.clone(),
                        message: format!(
                            "verification failed: expected {} files in {}",
                            expected,
                            target.display()
                        ),
                    });
                }
                info!(platform = %platform.name, "propagated shared output (copy)");
                Ok(())
            }
        }
    }

    fn fail(&self, platform: &Project, e: &dyn std::fmt::Display) -> Error {
        Error::Propagation {
            name: platform.name.clone(),
            message: e.to_string(),
        }
    }
}
