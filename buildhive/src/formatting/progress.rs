//! Progress bar for the archive job.

use indicatif::{ProgressBar, ProgressStyle};

/// A bar whose length grows while traversal discovers files, so early
/// percentages are estimates.
pub fn create_archive_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/.blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");
    pb.set_style(style);
    pb
}
