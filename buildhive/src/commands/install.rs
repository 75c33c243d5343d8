//! Dependency reinstall across sub-projects.

use std::path::Path;

use anyhow::Result;
use buildhive_core::{BuildDriver, Config, Project, ScriptDriver};

use crate::formatting::{print_error, print_success, print_warning};

use super::scan_projects;

/// Reinstalls the named projects, or every sub-project when no names were
/// given. Failures are reported per project and never stop the rest.
pub fn cmd_install(root: &Path, names: Vec<String>) -> Result<()> {
    let config = Config::load(root)?;
    let projects = scan_projects(root, &config)?;

    let all: Vec<&Project> = projects.all().collect();
    let targets: Vec<&Project> = if names.is_empty() {
        all
    } else {
        let mut targets = Vec::new();
        for name in &names {
            match all.iter().find(|p| &p.name == name) {
                Some(project) => targets.push(*project),
                None => {
                    print_warning(&format!("unknown project '{}', skipping", name));
                }
            }
        }
        targets
    };

    let driver = ScriptDriver::from_config(&config.commands);
    let mut failed = 0usize;
    for project in &targets {
        match driver.install(project) {
            Ok(()) => print_success(&format!("{} dependencies installed", project.name)),
            Err(e) => {
                failed += 1;
                print_error(&format!("{} install failed: {}", project.name, e));
            }
        }
    }

    if failed == 0 {
        print_success(&format!("installed {} project(s)", targets.len()));
    } else {
        print_warning(&format!(
            "{} of {} project(s) failed to install",
            failed,
            targets.len()
        ));
    }
    Ok(())
}
