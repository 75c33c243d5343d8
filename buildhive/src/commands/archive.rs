//! ZIP archival of the aggregate tree.

use std::path::{Path, PathBuf};

use anyhow::Result;
use buildhive_core::{Archiver, Config};
use owo_colors::OwoColorize;

use crate::formatting::{
    create_archive_bar, format_bytes, format_duration, print_success, print_warning,
    print_summary_box,
};
use crate::prompt::pick_indices;

use super::collect_dir;

/// Lists the archivable subdirectories of the aggregate tree, excluding the
/// shared library's scope directory (it ships inside each platform already).
fn archivable_dirs(dir: &Path, config: &Config) -> Result<Vec<String>> {
    let shared_scope = config
        .propagation
        .source
        .file_name()
        .map(|n| n.to_string_lossy().to_string());

    let mut names: Vec<String> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|name| Some(name) != shared_scope.as_ref())
        .collect();
    names.sort();
    Ok(names)
}

pub fn cmd_archive(
    root: &Path,
    dirs: Vec<String>,
    all: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = Config::load(root)?;
    let base = collect_dir(root, &config);

    if !base.is_dir() {
        print_warning(&format!(
            "{} does not exist, run a build first",
            base.display()
        ));
        std::process::exit(1);
    }

    let available = archivable_dirs(&base, &config)?;
    let chosen: Vec<String> = if all {
        available
    } else if !dirs.is_empty() {
        // Names are taken as given; a missing one is reported by the
        // archiver as a skipped entry rather than failing the whole job.
        dirs
    } else {
        let items: Vec<&str> = available.iter().map(String::as_str).collect();
        pick_indices("Select the directories to archive:", &items)?
            .into_iter()
            .map(|i| available[i].clone())
            .collect()
    };

    if chosen.is_empty() {
        print_warning("nothing selected, exiting");
        return Ok(());
    }

    println!("{}", "Archiving:".bold().cyan());
    for name in &chosen {
        println!("  - {}", name);
    }
    println!();

    let sources: Vec<PathBuf> = chosen.iter().map(|name| base.join(name)).collect();
    let dest = output.unwrap_or_else(|| base.join(&config.archive.file_name));

    let pb = create_archive_bar();
    let summary = Archiver::new().archive(&sources, &dest, |progress| {
        pb.set_length(progress.discovered);
        pb.set_position(progress.processed);
        pb.set_message(format_bytes(progress.bytes));
    })?;
    pb.finish_and_clear();

    for path in &summary.skipped {
        print_warning(&format!("missing directory skipped: {}", path.display()));
    }
    print_success(&format!("archive written to {}", dest.display()));
    print_summary_box(
        "Archive",
        &[
            ("Files", &summary.files.to_string()),
            ("Size", &format_bytes(summary.archive_bytes)),
            ("Duration", &format_duration(summary.elapsed.as_secs_f64())),
        ],
    );
    Ok(())
}
