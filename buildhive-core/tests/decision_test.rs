use std::path::PathBuf;

use buildhive_core::decision::{decide, PipelineDecision};
use buildhive_core::snapshot::ManifestSnapshot;
use buildhive_core::vcs::ConflictRecord;

fn conflict(project: &str, path: &str) -> ConflictRecord {
    ConflictRecord {
        project: project.to_string(),
        path: PathBuf::from(path),
    }
}

#[test]
fn test_conflicts_always_abort() {
    // Even with manifest changes, conflicts win.
    let before = ManifestSnapshot::from_entries([("a".to_string(), "v1".to_string())]);
    let after = ManifestSnapshot::from_entries([("a".to_string(), "v2".to_string())]);

    let verdict = decide(&before, &after, vec![conflict("a", "/pkgs/a/src/x.ts")]);

    assert_eq!(verdict.decision, PipelineDecision::Abort);
    assert_eq!(verdict.conflicts.len(), 1);
    assert_eq!(verdict.changed_manifests, vec!["a".to_string()]);
}

#[test]
fn test_changed_manifest_selects_full() {
    let before = ManifestSnapshot::from_entries([("a".to_string(), "v1".to_string())]);
    let after = ManifestSnapshot::from_entries([("a".to_string(), "v2".to_string())]);

    let verdict = decide(&before, &after, Vec::new());

    assert_eq!(verdict.decision, PipelineDecision::Full);
}

#[test]
fn test_no_changes_selects_fast() {
    let snapshot = ManifestSnapshot::from_entries([("a".to_string(), "v1".to_string())]);

    let verdict = decide(&snapshot, &snapshot.clone(), Vec::new());

    assert_eq!(verdict.decision, PipelineDecision::Fast);
    assert!(verdict.conflicts.is_empty());
    assert!(verdict.changed_manifests.is_empty());
}

#[test]
fn test_conflict_order_is_preserved_for_reporting() {
    let snapshot = ManifestSnapshot::default();
    let conflicts = vec![
        conflict("b", "/pkgs/b/one.ts"),
        conflict("a", "/pkgs/a/two.ts"),
    ];

    let verdict = decide(&snapshot, &snapshot.clone(), conflicts);

    let projects: Vec<&str> = verdict.conflicts.iter().map(|c| c.project.as_str()).collect();
    assert_eq!(projects, vec!["b", "a"]);
}
