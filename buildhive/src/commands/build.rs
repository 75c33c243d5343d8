//! The smart build pipeline command.

use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use buildhive_core::{
    probe_from_config, AllSelection, ArgsSelection, BuildMode, Collector, Config, Pipeline,
    PipelineState, RunReport, ScriptDriver, SelectionProvider, VcsTool,
};
use comfy_table::{Cell, Table};
use owo_colors::OwoColorize;

use crate::formatting::{
    format_duration, print_fail_banner, print_success, print_success_banner, print_summary_box,
    print_warning,
};
use crate::prompt::PromptSelection;

use super::{collect_dir, scan_projects};

pub fn cmd_build(root: &Path, platforms: Vec<String>, all: bool, archive: bool) -> Result<()> {
    let start = Instant::now();
    let started_at = chrono::Local::now();

    let config = Config::load(root)?;
    let projects = scan_projects(root, &config)?;

    if projects.platforms.is_empty() {
        print_warning("no platform sub-projects found, nothing to build");
        return Ok(());
    }

    // `--all` runs every platform concurrently and ungated; an explicit or
    // interactive selection builds sequentially behind the readiness gate.
    // The two modes are never mixed within one run.
    let provider: Box<dyn SelectionProvider> = if all {
        Box::new(AllSelection)
    } else if !platforms.is_empty() {
        Box::new(ArgsSelection::new(platforms))
    } else {
        Box::new(PromptSelection::new("Select the platforms to build:"))
    };
    let selection = provider.select(&projects.platforms)?;
    if selection.is_empty() {
        print_warning("no platforms selected, exiting");
        return Ok(());
    }
    let mode = if all {
        BuildMode::Concurrent
    } else {
        BuildMode::Gated
    };

    println!();
    println!("{}", "[Smart build]".bold().cyan());
    println!();

    let vcs = VcsTool::from_config(&config.vcs);
    let driver = ScriptDriver::from_config(&config.commands);
    let probe = probe_from_config(&config.gate);
    let mut pipeline = Pipeline::new(&config, &vcs, &driver, probe.as_ref());

    let report = match pipeline.run(&projects, &selection, mode) {
        Ok(report) => report,
        Err(e) => {
            print_fail_banner(&format!("Pipeline stopped: {}", e));
            std::process::exit(1);
        }
    };

    if report.state == PipelineState::Aborted {
        print_conflicts(&report);
        print_fail_banner("Run aborted, resolve the conflicts and retry");
        std::process::exit(1);
    }

    print_report(&report);

    // Aggregation runs whichever branch the pipeline took.
    let collector = Collector::new(collect_dir(root, &config), config.workspace.output_dir.clone());
    let summary = collector.collect(projects.all())?;
    for name in &summary.skipped {
        print_warning(&format!("{} had no build output to collect", name));
    }
    print_success(&format!(
        "collected {} file(s) into {}",
        summary.files,
        collector.destination().display()
    ));

    if archive {
        super::cmd_archive(root, Vec::new(), true, None)?;
    }

    let finished_at = chrono::Local::now();
    println!();
    print_summary_box(
        "Summary",
        &[
            ("Started", &started_at.format("%Y-%m-%d %H:%M:%S").to_string()),
            ("Finished", &finished_at.format("%Y-%m-%d %H:%M:%S").to_string()),
            ("Duration", &format_duration(start.elapsed().as_secs_f64())),
        ],
    );

    if report.all_built() {
        print_success_banner("Smart build finished successfully");
    } else {
        print_fail_banner("Smart build finished with platform failures");
    }
    Ok(())
}

fn print_conflicts(report: &RunReport) {
    if let Some(verdict) = &report.verdict {
        println!();
        println!("{}", "Conflicting files:".red().bold());
        for conflict in &verdict.conflicts {
            println!("  - {}", conflict.path.display());
        }
    }
}

fn print_report(report: &RunReport) {
    if let Some(verdict) = &report.verdict {
        if verdict.changed_manifests.is_empty() {
            print_success("no manifest changes, ran the fast pipeline");
        } else {
            print_warning(&format!(
                "manifests changed ({}), ran the full pipeline",
                verdict.changed_manifests.join(", ")
            ));
        }
    }

    for name in &report.propagation_failures {
        print_warning(&format!("{} did not receive the shared output", name));
    }

    let mut table = Table::new();
    table
        .set_header(vec![
            Cell::new("Status").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("Platform").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("Details").add_attribute(comfy_table::Attribute::Bold),
        ])
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS)
        .set_content_arrangement(comfy_table::ContentArrangement::Dynamic);

    for outcome in &report.outcomes {
        if outcome.success {
            table.add_row(vec![
                Cell::new("✓").fg(comfy_table::Color::Green),
                Cell::new(&outcome.platform),
                Cell::new(""),
            ]);
        } else {
            table.add_row(vec![
                Cell::new("✗").fg(comfy_table::Color::Red),
                Cell::new(&outcome.platform).fg(comfy_table::Color::Red),
                Cell::new(outcome.detail.as_deref().unwrap_or("build failed"))
                    .fg(comfy_table::Color::Red),
            ]);
        }
    }

    println!();
    println!("{}", table);
}
