//! Manifest snapshots and pre/post comparison.

use std::collections::BTreeMap;

use crate::project::Project;

/// Raw manifest text per project, captured at a point in time.
///
/// Comparison is exact text equality; no semantic diffing of the manifest
/// format. A project without a manifest file simply has no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestSnapshot {
    entries: BTreeMap<String, String>,
}

impl ManifestSnapshot {
    /// Captures the manifest content of every given project. Unreadable or
    /// missing manifests are recorded as absent.
    pub fn capture<'a>(
        projects: impl IntoIterator<Item = &'a Project>,
        manifest: &str,
    ) -> Self {
        let mut entries = BTreeMap::new();
        for project in projects {
            if let Ok(content) = std::fs::read_to_string(project.manifest_path(manifest)) {
                entries.insert(project.name.clone(), content);
            }
        }
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Names of projects whose manifest differs between `self` (before) and
    /// `after`, in name order. A manifest appearing or disappearing counts
    /// as a change.
    pub fn changed_since(&self, after: &ManifestSnapshot) -> Vec<String> {
        let mut names: Vec<&String> = self.entries.keys().chain(after.entries.keys()).collect();
        names.sort();
        names.dedup();

        names
            .into_iter()
            .filter(|name| self.entries.get(*name) != after.entries.get(*name))
            .cloned()
            .collect()
    }
}
