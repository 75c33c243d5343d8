//! Standalone aggregation of build outputs.

use std::path::Path;

use anyhow::Result;
use buildhive_core::{Collector, Config};

use crate::formatting::{print_success, print_warning};

use super::{collect_dir, scan_projects};

pub fn cmd_collect(root: &Path) -> Result<()> {
    let config = Config::load(root)?;
    let projects = scan_projects(root, &config)?;

    let collector = Collector::new(collect_dir(root, &config), config.workspace.output_dir.clone());
    let summary = collector.collect(projects.all())?;

    for name in &summary.skipped {
        print_warning(&format!("{} had no build output, skipped", name));
    }
    print_success(&format!(
        "collected {} file(s) from {} project(s) into {}",
        summary.files,
        summary.collected.len(),
        collector.destination().display()
    ));
    Ok(())
}
