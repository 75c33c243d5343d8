use std::collections::HashMap;
use std::path::{Path, PathBuf};

use buildhive_core::error::Result;
use buildhive_core::project::{Project, ProjectRole};
use buildhive_core::vcs::{PullOutcome, SyncRunner, VcsClient};

/// Scripted VCS: canned pull output per project directory basename.
struct FakeVcs {
    outputs: HashMap<String, PullOutcome>,
}

impl FakeVcs {
    fn new() -> Self {
        Self {
            outputs: HashMap::new(),
        }
    }

    fn with_pull(mut self, project: &str, output: &str, succeeded: bool) -> Self {
        self.outputs.insert(
            project.to_string(),
            PullOutcome {
                output: output.to_string(),
                succeeded,
                error: if succeeded {
                    None
                } else {
                    Some("E155000: interrupted".to_string())
                },
            },
        );
        self
    }
}

impl VcsClient for FakeVcs {
    fn revert(&self, _dir: &Path) -> Result<String> {
        Ok(String::new())
    }

    fn pull(&self, dir: &Path) -> PullOutcome {
        let name = dir.file_name().unwrap().to_string_lossy().to_string();
        self.outputs.get(&name).cloned().unwrap_or(PullOutcome {
            output: "At revision 100.\n".to_string(),
            succeeded: true,
            error: None,
        })
    }
}

fn project(name: &str) -> Project {
    Project::new(
        name.to_string(),
        PathBuf::from("/repo/packages").join(name),
        ProjectRole::Platform,
    )
}

#[test]
fn test_conflict_lines_become_records() {
    let vcs = FakeVcs::new().with_pull(
        "alpha",
        "U    src/app.ts\nC    src/store/index.ts\nUpdated to revision 101.\n",
        true,
    );
    let alpha = project("alpha");

    let report = SyncRunner::new(&vcs, "C    ").sync_all([&alpha]);

    assert_eq!(report.conflicts.len(), 1);
    assert_eq!(report.conflicts[0].project, "alpha");
    assert_eq!(
        report.conflicts[0].path,
        PathBuf::from("/repo/packages/alpha/src/store/index.ts")
    );
    assert!(report.pull_failures.is_empty());
}

#[test]
fn test_failed_pull_output_is_still_scanned() {
    // A partial pull can still report conflicting paths.
    let vcs = FakeVcs::new().with_pull("alpha", "C    src/broken.ts\n", false);
    let alpha = project("alpha");

    let report = SyncRunner::new(&vcs, "C    ").sync_all([&alpha]);

    assert_eq!(report.pull_failures, vec!["alpha".to_string()]);
    assert_eq!(report.conflicts.len(), 1);
    assert_eq!(
        report.conflicts[0].path,
        PathBuf::from("/repo/packages/alpha/src/broken.ts")
    );
}

#[test]
fn test_non_conflict_lines_are_ignored() {
    // "Checking..." starts with a C but not with the conflict prefix.
    let vcs = FakeVcs::new().with_pull(
        "alpha",
        "Checking out revision 5\nA    added.ts\nU    updated.ts\n",
        true,
    );
    let alpha = project("alpha");

    let report = SyncRunner::new(&vcs, "C    ").sync_all([&alpha]);
    assert!(report.conflicts.is_empty());
}

#[test]
fn test_conflicts_accumulate_in_discovery_order() {
    let vcs = FakeVcs::new()
        .with_pull("alpha", "C    a.ts\n", true)
        .with_pull("beta", "C    b.ts\n", true);
    let alpha = project("alpha");
    let beta = project("beta");

    let report = SyncRunner::new(&vcs, "C    ").sync_all([&alpha, &beta]);

    let projects: Vec<&str> = report.conflicts.iter().map(|c| c.project.as_str()).collect();
    assert_eq!(projects, vec!["alpha", "beta"]);
}
