//! ZIP archival with incremental progress.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::warn;
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;

/// Incremental archive progress. `discovered` grows as traversal proceeds,
/// so `processed / discovered` is only a late-stage estimate; callers must
/// not assume the percentage is accurate early in the job.
#[derive(Debug, Clone, Copy)]
pub struct ArchiveProgress {
    pub processed: u64,
    pub discovered: u64,
    /// Uncompressed bytes read so far.
    pub bytes: u64,
    pub elapsed: Duration,
}

/// Final archive statistics.
#[derive(Debug, Clone)]
pub struct ArchiveSummary {
    pub files: u64,
    /// Size of the finished archive on disk.
    pub archive_bytes: u64,
    /// Input directories that were missing and skipped.
    pub skipped: Vec<PathBuf>,
    pub elapsed: Duration,
}

/// Streams directories into a single ZIP at maximum deflate compression,
/// preserving each input directory as a top-level entry named after its own
/// basename.
pub struct Archiver {
    level: i32,
}

impl Default for Archiver {
    fn default() -> Self {
        // Deflate level 9: size over speed for release bundles.
        Self { level: 9 }
    }
}

impl Archiver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `sources` into one archive at `dest`. Missing source
    /// directories are reported and skipped, not fatal. `on_progress` fires
    /// on every discovered and every written file.
    pub fn archive<F>(
        &self,
        sources: &[PathBuf],
        dest: &Path,
        mut on_progress: F,
    ) -> Result<ArchiveSummary>
    where
        F: FnMut(&ArchiveProgress),
    {
        let started = Instant::now();
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut zip = ZipWriter::new(BufWriter::new(File::create(dest)?));
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(self.level));

        let mut progress = ArchiveProgress {
            processed: 0,
            discovered: 0,
            bytes: 0,
            elapsed: Duration::ZERO,
        };
        let mut skipped = Vec::new();

        for source in sources {
            if !source.is_dir() {
                warn!("archive input missing, skipping: {}", source.display());
                skipped.push(source.clone());
                continue;
            }
            let base = source
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "archive".to_string());

            // Traverse first so the discovered total keeps growing while
            // earlier entries are already being written.
            let mut files = Vec::new();
            let mut dirs = Vec::new();
            for entry in WalkDir::new(source).min_depth(1) {
                let entry = entry.map_err(|e| std::io::Error::other(e.to_string()))?;
                let rel = entry
                    .path()
                    .strip_prefix(source)
                    .map_err(|e| std::io::Error::other(e.to_string()))?
                    .to_string_lossy()
                    .replace('\\', "/");
                let name = format!("{}/{}", base, rel);
                if entry.file_type().is_dir() {
                    dirs.push(name);
                } else {
                    files.push((entry.path().to_path_buf(), name));
                    progress.discovered += 1;
                    progress.elapsed = started.elapsed();
                    on_progress(&progress);
                }
            }

            zip.add_directory(format!("{}/", base), options)?;
            for dir in dirs {
                zip.add_directory(format!("{}/", dir), options)?;
            }
            for (path, name) in files {
                zip.start_file(name, options)?;
                let mut reader = File::open(&path)?;
                progress.bytes += std::io::copy(&mut reader, &mut zip)?;
                progress.processed += 1;
                progress.elapsed = started.elapsed();
                on_progress(&progress);
            }
        }

        let mut inner = zip.finish()?;
        inner.flush()?;
        drop(inner);

        Ok(ArchiveSummary {
            files: progress.processed,
            archive_bytes: std::fs::metadata(dest)?.len(),
            skipped,
            elapsed: started.elapsed(),
        })
    }
}
