//! Secure-copy deployment of the aggregate tree.

use std::path::Path;
use std::process::Command;

use tracing::info;

use crate::config::DeployConfig;
use crate::error::{Error, Result};

/// Uploads the aggregate directory's contents via `scp -r`, with inherited
/// console streams.
pub struct Deployer<'a> {
    config: &'a DeployConfig,
}

impl<'a> Deployer<'a> {
    pub fn new(config: &'a DeployConfig) -> Self {
        Self { config }
    }

    pub fn remote(&self) -> String {
        format!(
            "{}@{}:{}",
            self.config.user, self.config.host, self.config.remote_path
        )
    }

    /// Fails fast when the local directory is missing or empty; a deploy of
    /// nothing is always an operator mistake.
    pub fn deploy(&self, local_dir: &Path) -> Result<()> {
        if !local_dir.is_dir() {
            return Err(Error::DeployPrecondition(format!(
                "{} does not exist, run a build first",
                local_dir.display()
            )));
        }
        let entries: Vec<_> = std::fs::read_dir(local_dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .collect();
        if entries.is_empty() {
            return Err(Error::DeployPrecondition(format!(
                "{} is empty, run a build first",
                local_dir.display()
            )));
        }

        let remote = self.remote();
        info!("uploading {} entries to {}", entries.len(), remote);

        let status = Command::new("scp")
            .arg("-P")
            .arg(self.config.port.to_string())
            .arg("-r")
            .args(&entries)
            .arg(&remote)
            .status()
            .map_err(|e| Error::Deploy(format!("failed to spawn scp: {}", e)))?;

        if !status.success() {
            return Err(Error::Deploy(format!("scp exited with {}", status)));
        }
        Ok(())
    }
}
