//! Project discovery listing.

use std::path::Path;

use anyhow::Result;
use buildhive_core::Config;
use owo_colors::OwoColorize;

use super::scan_projects;

pub fn cmd_scan(root: &Path, json: bool) -> Result<()> {
    let config = Config::load(root)?;
    let projects = scan_projects(root, &config)?;

    if json {
        let listing = serde_json::json!({
            "shared": projects.shared,
            "platforms": projects.platforms,
        });
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!("{}", "[Discovered sub-projects]".bold().cyan());
    println!();
    println!(
        "  {} {}",
        projects.shared.name.bold().white(),
        format!("({})", projects.shared.role.as_str()).bright_black()
    );
    for platform in &projects.platforms {
        println!(
            "  {} {}",
            platform.name.bold().white(),
            format!("({})", platform.role.as_str()).bright_black()
        );
    }
    println!();
    Ok(())
}
