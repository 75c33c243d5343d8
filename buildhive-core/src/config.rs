//! TOML configuration for the orchestrator.
//!
//! Everything that was once ambient global state (server credentials, fixed
//! tool paths, the conflict-marker format) lives here as an explicit
//! structure, loaded from `buildhive.toml` at the monorepo root and validated
//! once at startup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Top-level configuration, one section per concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub workspace: WorkspaceConfig,
    #[serde(default)]
    pub commands: CommandsConfig,
    #[serde(default)]
    pub vcs: VcsConfig,
    #[serde(default)]
    pub gate: GateConfig,
    #[serde(default)]
    pub propagation: PropagationConfig,
    #[serde(default)]
    pub archive: ArchiveConfig,
    /// Optional; deploy is refused when absent.
    pub deploy: Option<DeployConfig>,
}

/// Workspace layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Directory holding the sub-projects, relative to the monorepo root.
    #[serde(default = "default_packages_dir")]
    pub packages_dir: PathBuf,
    /// Per-project build output directory name.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Unified aggregate destination, relative to the monorepo root.
    #[serde(default = "default_collect_dir")]
    pub collect_dir: PathBuf,
    /// Substring identifying the shared library directory.
    #[serde(default = "default_shared_marker")]
    pub shared_marker: String,
    /// Dependency manifest file name.
    #[serde(default = "default_manifest")]
    pub manifest: String,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            packages_dir: default_packages_dir(),
            output_dir: default_output_dir(),
            collect_dir: default_collect_dir(),
            shared_marker: default_shared_marker(),
            manifest: default_manifest(),
        }
    }
}

/// Package-manager invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandsConfig {
    #[serde(default = "default_package_manager")]
    pub package_manager: String,
    /// Script run as `<package_manager> run <build_script>`.
    #[serde(default = "default_build_script")]
    pub build_script: String,
    /// Arguments run as `<package_manager> <install_args...>`.
    #[serde(default = "default_install_args")]
    pub install_args: Vec<String>,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            package_manager: default_package_manager(),
            build_script: default_build_script(),
            install_args: default_install_args(),
        }
    }
}

/// Version-control tool invocations and output parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VcsConfig {
    /// Command discarding local modifications, run in the project directory.
    #[serde(default = "default_revert")]
    pub revert: Vec<String>,
    /// Command pulling the latest remote revision.
    #[serde(default = "default_update")]
    pub update: Vec<String>,
    /// A pull-output line starting with this prefix names a conflicting path.
    /// The default is the svn status column format; other tools need their
    /// own prefix here.
    #[serde(default = "default_conflict_prefix")]
    pub conflict_prefix: String,
}

impl Default for VcsConfig {
    fn default() -> Self {
        Self {
            revert: default_revert(),
            update: default_update(),
            conflict_prefix: default_conflict_prefix(),
        }
    }
}

/// Readiness gate on the shared toolchain background process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Process name to watch for in the host process table.
    #[serde(default = "default_gate_process")]
    pub process: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// When set, the gate watches this lock file instead of the process
    /// table. Preferred where the toolchain exposes one.
    pub lock_file: Option<PathBuf>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            process: default_gate_process(),
            poll_interval_ms: default_poll_interval_ms(),
            max_attempts: default_max_attempts(),
            lock_file: None,
        }
    }
}

/// Shared-library output propagation paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropagationConfig {
    /// Subtree of the shared library directory that platforms consume.
    #[serde(default = "default_propagation_source")]
    pub source: PathBuf,
    /// Cached copy location inside each platform directory.
    #[serde(default = "default_propagation_target")]
    pub target: PathBuf,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            source: default_propagation_source(),
            target: default_propagation_target(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Archive file name, created inside the aggregate directory.
    #[serde(default = "default_archive_file")]
    pub file_name: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            file_name: default_archive_file(),
        }
    }
}

/// Secure-copy deployment target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    pub host: String,
    pub user: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub remote_path: String,
}

fn default_packages_dir() -> PathBuf {
    PathBuf::from("packages")
}
fn default_output_dir() -> String {
    "dist".to_string()
}
fn default_collect_dir() -> PathBuf {
    PathBuf::from("dist")
}
fn default_shared_marker() -> String {
    "-lib".to_string()
}
fn default_manifest() -> String {
    "package.json".to_string()
}
fn default_package_manager() -> String {
    "npm".to_string()
}
fn default_build_script() -> String {
    "build-all".to_string()
}
fn default_install_args() -> Vec<String> {
    vec!["install".to_string(), "--force".to_string()]
}
fn default_revert() -> Vec<String> {
    vec![
        "svn".to_string(),
        "revert".to_string(),
        "-R".to_string(),
        ".".to_string(),
    ]
}
fn default_update() -> Vec<String> {
    vec!["svn".to_string(), "update".to_string()]
}
fn default_conflict_prefix() -> String {
    "C    ".to_string()
}
fn default_gate_process() -> String {
    "ngcc".to_string()
}
fn default_poll_interval_ms() -> u64 {
    1000
}
fn default_max_attempts() -> u32 {
    60
}
fn default_propagation_source() -> PathBuf {
    PathBuf::from("dist/@shared")
}
fn default_propagation_target() -> PathBuf {
    PathBuf::from("node_modules/@shared")
}
fn default_archive_file() -> String {
    "bundle.zip".to_string()
}
fn default_port() -> u16 {
    22
}

impl Config {
    pub const FILE_NAME: &'static str = "buildhive.toml";

    /// Loads `buildhive.toml` from the monorepo root. A missing file yields
    /// the defaults; a present file must parse and validate.
    pub fn load(root: impl AsRef<Path>) -> Result<Self> {
        let path = root.as_ref().join(Self::FILE_NAME);
        let config = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Required-field validation, run once at startup.
    pub fn validate(&self) -> Result<()> {
        if self.workspace.shared_marker.is_empty() {
            return Err(Error::Config("workspace.shared_marker is empty".into()));
        }
        if self.workspace.manifest.is_empty() {
            return Err(Error::Config("workspace.manifest is empty".into()));
        }
        if self.commands.package_manager.is_empty() {
            return Err(Error::Config("commands.package_manager is empty".into()));
        }
        if self.commands.install_args.is_empty() {
            return Err(Error::Config("commands.install_args is empty".into()));
        }
        if self.vcs.revert.is_empty() || self.vcs.update.is_empty() {
            return Err(Error::Config("vcs.revert and vcs.update need a command".into()));
        }
        if self.vcs.conflict_prefix.is_empty() {
            return Err(Error::Config("vcs.conflict_prefix is empty".into()));
        }
        if self.gate.max_attempts == 0 {
            return Err(Error::Config("gate.max_attempts must be at least 1".into()));
        }
        if let Some(deploy) = &self.deploy {
            if deploy.host.is_empty() || deploy.user.is_empty() || deploy.remote_path.is_empty() {
                return Err(Error::Config(
                    "deploy.host, deploy.user and deploy.remote_path are required".into(),
                ));
            }
        }
        Ok(())
    }
}
