//! Shared filesystem helpers for tree copy and verification.

use std::path::Path;

use walkdir::WalkDir;

use crate::error::Result;

/// Recursively copies the contents of `src` into `dst`, creating `dst` and
/// merging into existing directories. Returns the number of files copied.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<u64> {
    std::fs::create_dir_all(dst)?;
    let mut files = 0u64;

    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry.map_err(|e| std::io::Error::other(e.to_string()))?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        let target = dst.join(rel);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &target)?;
            files += 1;
        }
    }
    Ok(files)
}

/// Counts regular files under `dir`, recursively. Missing directory counts
/// as zero.
pub fn count_files(dir: &Path) -> u64 {
    WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .count() as u64
}
