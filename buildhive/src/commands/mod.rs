//! Command implementations for the CLI.

mod archive;
mod build;
mod collect;
mod deploy;
mod install;
mod scan;
mod sync;

use std::path::Path;

use buildhive_core::{Config, ProjectSet, Result, Scanner};

pub use archive::cmd_archive;
pub use build::cmd_build;
pub use collect::cmd_collect;
pub use deploy::cmd_deploy;
pub use install::cmd_install;
pub use scan::cmd_scan;
pub use sync::cmd_sync;

fn scan_projects(root: &Path, config: &Config) -> Result<ProjectSet> {
    Scanner::new(
        root.join(&config.workspace.packages_dir),
        &config.workspace.shared_marker,
    )
    .scan()
}

fn collect_dir(root: &Path, config: &Config) -> std::path::PathBuf {
    root.join(&config.workspace.collect_dir)
}
