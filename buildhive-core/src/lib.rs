//! Core library for monorepo build-and-release orchestration.

pub mod archive;
pub mod builder;
pub mod collect;
pub mod config;
pub mod decision;
pub mod deploy;
pub mod error;
pub mod fsops;
pub mod gate;
pub mod pipeline;
pub mod project;
pub mod propagate;
pub mod scanner;
pub mod selection;
pub mod snapshot;
pub mod vcs;

pub use archive::{ArchiveProgress, ArchiveSummary, Archiver};
pub use builder::{BuildDriver, ScriptDriver};
pub use collect::{CollectSummary, Collector};
pub use config::{Config, DeployConfig};
pub use decision::{decide, PipelineDecision, SyncVerdict};
pub use deploy::Deployer;
pub use error::{Error, Result};
pub use gate::{probe_from_config, LockFileProbe, NameProbe, ProcessProbe, ReadinessGate};
pub use pipeline::{BuildMode, BuildOutcome, Pipeline, PipelineState, RunReport};
pub use project::{Project, ProjectRole, ProjectSet};
pub use propagate::{PropagationOutcome, Propagator};
pub use scanner::Scanner;
pub use selection::{AllSelection, ArgsSelection, SelectionProvider};
pub use snapshot::ManifestSnapshot;
pub use vcs::{ConflictRecord, PullOutcome, SyncReport, SyncRunner, VcsClient, VcsTool};
