//! Project discovery in the packages directory.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::project::{Project, ProjectRole, ProjectSet};

/// Discovers sub-projects by listing the immediate entries of the packages
/// directory. Directories only; the one whose name contains the shared-library
/// marker is the shared library, every other directory is a platform.
pub struct Scanner {
    packages_dir: PathBuf,
    shared_marker: String,
}

impl Scanner {
    pub fn new(packages_dir: impl AsRef<Path>, shared_marker: impl Into<String>) -> Self {
        Self {
            packages_dir: packages_dir.as_ref().to_path_buf(),
            shared_marker: shared_marker.into(),
        }
    }

    /// Scans the packages directory once. Discovery order is name order.
    ///
    /// # Errors
    ///
    /// Fails when the packages directory is missing, or when zero or more
    /// than one directory matches the shared-library marker.
    pub fn scan(&self) -> Result<ProjectSet> {
        if !self.packages_dir.is_dir() {
            return Err(Error::PackagesDirNotFound(self.packages_dir.clone()));
        }

        let mut names: Vec<String> = std::fs::read_dir(&self.packages_dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect();
        names.sort();

        let mut shared = Vec::new();
        let mut platforms = Vec::new();
        for name in names {
            let path = self.packages_dir.join(&name);
            if name.contains(&self.shared_marker) {
                shared.push(Project::new(name, path, ProjectRole::SharedLibrary));
            } else {
                platforms.push(Project::new(name, path, ProjectRole::Platform));
            }
        }

        match shared.len() {
            0 => Err(Error::SharedLibraryNotFound {
                dir: self.packages_dir.clone(),
                marker: self.shared_marker.clone(),
            }),
            1 => Ok(ProjectSet {
                shared: shared.remove(0),
                platforms,
            }),
            _ => Err(Error::SharedLibraryAmbiguous {
                marker: self.shared_marker.clone(),
                names: shared
                    .iter()
                    .map(|p| p.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }
}
