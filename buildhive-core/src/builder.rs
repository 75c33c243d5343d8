//! Build and install command invocation.

use std::process::Command;

use tracing::info;

use crate::config::CommandsConfig;
use crate::error::{Error, Result};
use crate::project::Project;

/// The two package-manager operations the pipeline needs. A trait seam so
/// tests can substitute a recording fake for the real subprocess driver.
pub trait BuildDriver {
    /// Reinstalls the project's dependencies.
    fn install(&self, project: &Project) -> Result<()>;

    /// Runs the project's build script.
    fn build(&self, project: &Project) -> Result<()>;
}

/// Runs `<package-manager> run <script>` and `<package-manager> <install
/// args>` with the project directory as working directory and inherited
/// console streams, so the operator sees native tool output live.
pub struct ScriptDriver {
    package_manager: String,
    build_script: String,
    install_args: Vec<String>,
}

impl ScriptDriver {
    pub fn from_config(config: &CommandsConfig) -> Self {
        Self {
            package_manager: config.package_manager.clone(),
            build_script: config.build_script.clone(),
            install_args: config.install_args.clone(),
        }
    }

    fn run(&self, project: &Project, args: &[&str]) -> Result<()> {
        let rendered = format!("{} {}", self.package_manager, args.join(" "));
        info!(project = %project.name, "running '{}'", rendered);

        let status = Command::new(&self.package_manager)
            .args(args)
            .current_dir(&project.path)
            .status()
            .map_err(|e| Error::CommandFailed {
                project: project.name.clone(),
                message: format!("'{}': {}", rendered, e),
            })?;

        if !status.success() {
            return Err(Error::CommandFailed {
                project: project.name.clone(),
                message: format!("'{}' exited with {}", rendered, status),
            });
        }
        Ok(())
    }
}

impl BuildDriver for ScriptDriver {
    fn install(&self, project: &Project) -> Result<()> {
        let args: Vec<&str> = self.install_args.iter().map(String::as_str).collect();
        self.run(project, &args)
    }

    fn build(&self, project: &Project) -> Result<()> {
        self.run(project, &["run", self.build_script.as_str()])
    }
}
