//! Standalone synchronization: revert + update everything, report, no build.

use std::path::Path;

use anyhow::Result;
use buildhive_core::{decide, Config, ManifestSnapshot, PipelineDecision, SyncRunner, VcsTool};
use owo_colors::OwoColorize;

use crate::formatting::{print_success, print_warning};

use super::scan_projects;

pub fn cmd_sync(root: &Path) -> Result<()> {
    let config = Config::load(root)?;
    let projects = scan_projects(root, &config)?;

    let manifest = &config.workspace.manifest;
    let before = ManifestSnapshot::capture(projects.all(), manifest);
    let vcs = VcsTool::from_config(&config.vcs);
    let report = SyncRunner::new(&vcs, &config.vcs.conflict_prefix).sync_all(projects.all());
    let after = ManifestSnapshot::capture(projects.all(), manifest);

    let verdict = decide(&before, &after, report.conflicts);

    if verdict.decision == PipelineDecision::Abort {
        println!();
        println!("{}", "Conflicting files:".red().bold());
        for conflict in &verdict.conflicts {
            println!("  - {}", conflict.path.display());
        }
        println!();
        println!("Resolve the conflicts by hand, then run again.");
        std::process::exit(1);
    }

    print_success("all sub-projects updated, no conflicts");

    if verdict.changed_manifests.is_empty() {
        print_success("no manifest changes after update");
    } else {
        print_warning(&format!(
            "manifests changed in: {}",
            verdict.changed_manifests.join(", ")
        ));
        println!("  Run 'buildhive install' to bring dependencies in sync.");
    }
    Ok(())
}
