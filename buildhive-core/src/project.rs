//! Project data model.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Role of a sub-project inside the packages directory.
///
/// Exactly one project per workspace carries `SharedLibrary`; every other
/// directory is a `Platform` and depends on the shared library's build output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectRole {
    SharedLibrary,
    Platform,
}

impl ProjectRole {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectRole::SharedLibrary => "shared-library",
            ProjectRole::Platform => "platform",
        }
    }
}

/// One independently buildable unit inside the packages directory.
///
/// Immutable for the duration of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Directory basename.
    pub name: String,
    /// Absolute filesystem path.
    pub path: PathBuf,
    pub role: ProjectRole,
}

impl Project {
    pub fn new(name: String, path: PathBuf, role: ProjectRole) -> Self {
        Self { name, path, role }
    }

    #[inline]
    pub fn is_shared(&self) -> bool {
        self.role == ProjectRole::SharedLibrary
    }

    /// Path to this project's dependency manifest.
    pub fn manifest_path(&self, manifest: &str) -> PathBuf {
        self.path.join(manifest)
    }
}

/// The discovered projects of one run: the single shared library plus all
/// platforms, ordered by name.
#[derive(Debug, Clone)]
pub struct ProjectSet {
    pub shared: Project,
    pub platforms: Vec<Project>,
}

impl ProjectSet {
    /// Iterates shared library first, then platforms in discovery order.
    pub fn all(&self) -> impl Iterator<Item = &Project> {
        std::iter::once(&self.shared).chain(self.platforms.iter())
    }

    pub fn platform(&self, name: &str) -> Option<&Project> {
        self.platforms.iter().find(|p| p.name == name)
    }
}
