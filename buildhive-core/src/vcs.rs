//! VCS synchronization and conflict scanning.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::VcsConfig;
use crate::error::{Error, Result};
use crate::project::Project;

/// A file the VCS reported as having unresolved concurrent changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictRecord {
    /// Project the conflict was reported in.
    pub project: String,
    /// Absolute path: project path joined with the repository-relative path
    /// from the tool output.
    pub path: PathBuf,
}

/// Outcome of one pull invocation. A failed pull can still carry partial
/// output worth scanning for conflict markers.
#[derive(Debug, Clone)]
pub struct PullOutcome {
    pub output: String,
    pub succeeded: bool,
    pub error: Option<String>,
}

/// The two version-control operations the sync pass needs.
pub trait VcsClient {
    /// Discards local modifications in `dir`.
    fn revert(&self, dir: &Path) -> Result<String>;

    /// Pulls the latest remote revision into `dir`, capturing tool output
    /// even on failure.
    fn pull(&self, dir: &Path) -> PullOutcome;
}

/// Drives the configured external VCS commands (svn by default).
pub struct VcsTool {
    revert_argv: Vec<String>,
    update_argv: Vec<String>,
}

impl VcsTool {
    pub fn from_config(config: &VcsConfig) -> Self {
        Self {
            revert_argv: config.revert.clone(),
            update_argv: config.update.clone(),
        }
    }

    fn run(argv: &[String], dir: &Path) -> std::io::Result<std::process::Output> {
        Command::new(&argv[0])
            .args(&argv[1..])
            .current_dir(dir)
            .output()
    }
}

impl VcsClient for VcsTool {
    fn revert(&self, dir: &Path) -> Result<String> {
        let output = Self::run(&self.revert_argv, dir).map_err(|e| Error::VcsRevert {
            project: dir.display().to_string(),
            message: e.to_string(),
        })?;
        if !output.status.success() {
            return Err(Error::VcsRevert {
                project: dir.display().to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn pull(&self, dir: &Path) -> PullOutcome {
        match Self::run(&self.update_argv, dir) {
            Ok(output) => PullOutcome {
                output: String::from_utf8_lossy(&output.stdout).to_string(),
                succeeded: output.status.success(),
                error: if output.status.success() {
                    None
                } else {
                    Some(String::from_utf8_lossy(&output.stderr).trim().to_string())
                },
            },
            Err(e) => PullOutcome {
                output: String::new(),
                succeeded: false,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Per-project sync results, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub conflicts: Vec<ConflictRecord>,
    /// Projects whose pull failed outright (still conflict-scanned).
    pub pull_failures: Vec<String>,
}

/// Reverts then pulls each project, accumulating conflict records.
///
/// Revert failures are benign on a clean tree and never abort the run; pull
/// failures are logged and their captured output is still scanned, since a
/// partial pull can report conflicting paths.
pub struct SyncRunner<'a> {
    vcs: &'a dyn VcsClient,
    conflict_prefix: &'a str,
}

impl<'a> SyncRunner<'a> {
    pub fn new(vcs: &'a dyn VcsClient, conflict_prefix: &'a str) -> Self {
        Self {
            vcs,
            conflict_prefix,
        }
    }

    /// Synchronizes every project sequentially, preserving conflict-log order.
    pub fn sync_all<'p>(&self, projects: impl IntoIterator<Item = &'p Project>) -> SyncReport {
        let mut report = SyncReport::default();

        for project in projects {
            match self.vcs.revert(&project.path) {
                Ok(output) => {
                    if !output.trim().is_empty() {
                        debug!(project = %project.name, "revert output:\n{}", output.trim());
                    }
                }
                Err(e) => warn!(project = %project.name, "revert failed: {}", e),
            }

            let outcome = self.vcs.pull(&project.path);
            if let Some(error) = &outcome.error {
                warn!(project = %project.name, "update failed: {}", error);
                report.pull_failures.push(project.name.clone());
            }
            self.scan_conflicts(project, &outcome.output, &mut report.conflicts);
        }

        report
    }

    /// A conflict is any output line starting with the configured prefix;
    /// the remainder of the line (trimmed) is the repository-relative path.
    fn scan_conflicts(&self, project: &Project, output: &str, conflicts: &mut Vec<ConflictRecord>) {
        for line in output.lines() {
            if let Some(rest) = line.strip_prefix(self.conflict_prefix) {
                let rel = rest.trim();
                if !rel.is_empty() {
                    conflicts.push(ConflictRecord {
                        project: project.name.clone(),
                        path: project.path.join(rel),
                    });
                }
            }
        }
    }
}
