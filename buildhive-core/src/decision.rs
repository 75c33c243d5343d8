//! Pipeline decision from sync results.

use crate::snapshot::ManifestSnapshot;
use crate::vcs::ConflictRecord;

/// Which branch the run takes after synchronization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineDecision {
    /// Conflicts present; the operator must resolve them by hand.
    Abort,
    /// Manifests changed; reinstall dependencies before building.
    Full,
    /// Nothing changed; build without reinstalling.
    Fast,
}

impl PipelineDecision {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineDecision::Abort => "abort",
            PipelineDecision::Full => "full",
            PipelineDecision::Fast => "fast",
        }
    }
}

/// Decision plus the evidence behind it, for operator reporting.
#[derive(Debug, Clone)]
pub struct SyncVerdict {
    pub decision: PipelineDecision,
    /// In conflict-log order.
    pub conflicts: Vec<ConflictRecord>,
    /// Project names whose manifest changed, in name order.
    pub changed_manifests: Vec<String>,
}

/// Pure decision function over the sync evidence.
///
/// Deterministic for a given pair of snapshots and conflict list; callers
/// must not rely on sequence order for anything beyond report formatting.
pub fn decide(
    before: &ManifestSnapshot,
    after: &ManifestSnapshot,
    conflicts: Vec<ConflictRecord>,
) -> SyncVerdict {
    let changed_manifests = before.changed_since(after);

    let decision = if !conflicts.is_empty() {
        PipelineDecision::Abort
    } else if !changed_manifests.is_empty() {
        PipelineDecision::Full
    } else {
        PipelineDecision::Fast
    };

    SyncVerdict {
        decision,
        conflicts,
        changed_manifests,
    }
}
