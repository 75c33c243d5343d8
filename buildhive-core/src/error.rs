//! Error types and result aliases.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error in {context}: {error}")]
    Toml {
        error: toml::de::Error,
        context: String,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Packages directory not found: {0}")]
    PackagesDirNotFound(PathBuf),

    #[error("No shared library in {dir}: no directory name contains '{marker}'")]
    SharedLibraryNotFound { dir: PathBuf, marker: String },

    #[error("Multiple shared libraries match '{marker}': {names}")]
    SharedLibraryAmbiguous { marker: String, names: String },

    #[error("Platform not found: {name}. Available platforms: {available}")]
    ProjectNotFound { name: String, available: String },

    #[error("Command failed for {project}: {message}")]
    CommandFailed { project: String, message: String },

    #[error("VCS revert failed for {project}: {message}")]
    VcsRevert { project: String, message: String },

    #[error("VCS update failed for {project}: {message}")]
    VcsPull { project: String, message: String },

    #[error("Process '{process}' still busy after {waited_secs}s")]
    ProcessStuck { process: String, waited_secs: u64 },

    #[error("Shared library build failed for {name}: {message}")]
    SharedLibraryBuild { name: String, message: String },

    #[error("Platform build failed for {name}: {message}")]
    PlatformBuild { name: String, message: String },

    #[error("Propagation failed for {name}: {message}")]
    Propagation { name: String, message: String },

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Deploy precondition failed: {0}")]
    DeployPrecondition(String),

    #[error("Deploy failed: {0}")]
    Deploy(String),
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Error::Toml {
            error,
            context: "buildhive.toml".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
