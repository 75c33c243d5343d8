//! Change-aware pipeline selection and orchestration.
//!
//! The one place with real decision logic: synchronize every sub-project,
//! weigh conflicts and manifest changes, pick a branch, then sequence
//! reinstall, shared-library build, propagation and platform builds in the
//! only order that is correct (shared library before everything that
//! consumes it).

use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{error, info, warn};

use crate::builder::BuildDriver;
use crate::config::Config;
use crate::decision::{decide, PipelineDecision, SyncVerdict};
use crate::error::{Error, Result};
use crate::gate::{ProcessProbe, ReadinessGate};
use crate::project::{Project, ProjectSet};
use crate::propagate::Propagator;
use crate::snapshot::ManifestSnapshot;
use crate::vcs::{SyncRunner, VcsClient};

/// Pipeline lifecycle. `Aborted` is terminal with failure status; the three
/// non-terminal states only ever advance forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Syncing,
    Deciding,
    Aborted,
    FullPipeline,
    FastPipeline,
    Done,
}

impl PipelineState {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineState::Idle => "idle",
            PipelineState::Syncing => "syncing",
            PipelineState::Deciding => "deciding",
            PipelineState::Aborted => "aborted",
            PipelineState::FullPipeline => "full-pipeline",
            PipelineState::FastPipeline => "fast-pipeline",
            PipelineState::Done => "done",
        }
    }
}

/// How the selected platforms build.
///
/// `Gated` waits out the shared toolchain before each sequential build;
/// `Concurrent` runs every platform at once with no per-platform gate. The
/// two must not be mixed within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    Gated,
    Concurrent,
}

/// Per-platform build result. Failures are soft: reported, never propagated
/// to siblings.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub platform: String,
    pub success: bool,
    pub detail: Option<String>,
}

/// Everything the operator needs to know about one run.
#[derive(Debug)]
pub struct RunReport {
    pub state: PipelineState,
    pub verdict: Option<SyncVerdict>,
    /// Platforms whose propagation failed (logged, non-fatal).
    pub propagation_failures: Vec<String>,
    pub outcomes: Vec<BuildOutcome>,
    pub elapsed: Duration,
}

impl RunReport {
    /// True when every platform built (an aborted run is not ok either).
    pub fn all_built(&self) -> bool {
        self.state == PipelineState::Done && self.outcomes.iter().all(|o| o.success)
    }
}

/// Drives one run end to end. External effects go through the trait seams
/// (`VcsClient`, `BuildDriver`, `ProcessProbe`); everything else is local
/// filesystem work.
pub struct Pipeline<'a> {
    config: &'a Config,
    vcs: &'a (dyn VcsClient + Sync),
    driver: &'a (dyn BuildDriver + Sync),
    probe: &'a (dyn ProcessProbe + Sync),
    state: PipelineState,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a Config,
        vcs: &'a (dyn VcsClient + Sync),
        driver: &'a (dyn BuildDriver + Sync),
        probe: &'a (dyn ProcessProbe + Sync),
    ) -> Self {
        Self {
            config,
            vcs,
            driver,
            probe,
            state: PipelineState::Idle,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Runs the full pipeline for `selection`.
    ///
    /// An empty selection performs no work. Conflicts abort before any build.
    /// A shared-library build failure is the one unrecoverable error; platform
    /// build and propagation failures are recorded in the report instead.
    pub fn run(
        &mut self,
        projects: &ProjectSet,
        selection: &[&Project],
        mode: BuildMode,
    ) -> Result<RunReport> {
        let started = Instant::now();

        if selection.is_empty() {
            info!("no platforms selected, nothing to do");
            self.state = PipelineState::Done;
            return Ok(RunReport {
                state: self.state,
                verdict: None,
                propagation_failures: Vec::new(),
                outcomes: Vec::new(),
                elapsed: started.elapsed(),
            });
        }

        // Sync brackets the manifest snapshot: capture, revert+pull every
        // sub-project, capture again.
        self.state = PipelineState::Syncing;
        let manifest = &self.config.workspace.manifest;
        let before = ManifestSnapshot::capture(projects.all(), manifest);
        let sync = SyncRunner::new(self.vcs, &self.config.vcs.conflict_prefix)
            .sync_all(projects.all());
        let after = ManifestSnapshot::capture(projects.all(), manifest);

        self.state = PipelineState::Deciding;
        let verdict = decide(&before, &after, sync.conflicts);

        match verdict.decision {
            PipelineDecision::Abort => {
                error!(
                    "{} conflicting file(s) detected, aborting before any build",
                    verdict.conflicts.len()
                );
                self.state = PipelineState::Aborted;
                return Ok(RunReport {
                    state: self.state,
                    verdict: Some(verdict),
                    propagation_failures: Vec::new(),
                    outcomes: Vec::new(),
                    elapsed: started.elapsed(),
                });
            }
            PipelineDecision::Full => {
                info!("manifest changes detected, reinstalling dependencies first");
                self.state = PipelineState::FullPipeline;
                self.install_all(projects);
            }
            PipelineDecision::Fast => {
                info!("no manifest changes, building without reinstall");
                self.state = PipelineState::FastPipeline;
            }
        }

        // The shared library feeds every platform: gate, build (fatal on
        // failure), then fan the output out.
        self.wait_for_toolchain();
        self.driver
            .build(&projects.shared)
            .map_err(|e| Error::SharedLibraryBuild {
                name: projects.shared.name.clone(),
                message: e.to_string(),
            })?;

        let propagator = Propagator::new(&projects.shared, &self.config.propagation);
        let propagation_failures: Vec<String> = propagator
            .propagate_all(selection)
            .into_iter()
            .filter(|o| o.result.is_err())
            .map(|o| o.platform)
            .collect();

        let outcomes = match mode {
            BuildMode::Gated => self.build_gated(selection),
            BuildMode::Concurrent => self.build_concurrent(selection),
        };

        self.state = PipelineState::Done;
        Ok(RunReport {
            state: self.state,
            verdict: Some(verdict),
            propagation_failures,
            outcomes,
            elapsed: started.elapsed(),
        })
    }

    /// Reinstall for every sub-project; per-project failures are logged and
    /// do not stop the rest.
    fn install_all(&self, projects: &ProjectSet) {
        for project in projects.all() {
            if let Err(e) = self.driver.install(project) {
                warn!(project = %project.name, "install failed: {}", e);
            }
        }
    }

    /// A stuck toolchain is caller-decided severity; here the run proceeds
    /// after logging, matching the release-operator workflow.
    fn wait_for_toolchain(&self) {
        let gate = ReadinessGate::from_config(&self.config.gate);
        if let Err(e) = gate.wait(self.probe, &self.config.gate.process) {
            warn!("{}; continuing anyway", e);
        }
    }

    fn build_gated(&self, selection: &[&Project]) -> Vec<BuildOutcome> {
        selection
            .iter()
            .map(|platform| {
                self.wait_for_toolchain();
                self.build_one(platform)
            })
            .collect()
    }

    fn build_concurrent(&self, selection: &[&Project]) -> Vec<BuildOutcome> {
        let mut outcomes: Vec<BuildOutcome> = selection
            .par_iter()
            .map(|platform| self.build_one(platform))
            .collect();
        outcomes.sort_by(|a, b| a.platform.cmp(&b.platform));
        outcomes
    }

    fn build_one(&self, platform: &Project) -> BuildOutcome {
        match self.driver.build(platform) {
            Ok(()) => BuildOutcome {
                platform: platform.name.clone(),
                success: true,
                detail: None,
            },
            Err(e) => {
                let failure = Error::PlatformBuild {
                    name: platform.name.clone(),
                    message: e.to_string(),
                };
                warn!("{}", failure);
                BuildOutcome {
                    platform: platform.name.clone(),
                    success: false,
                    detail: Some(failure.to_string()),
                }
            }
        }
    }
}
