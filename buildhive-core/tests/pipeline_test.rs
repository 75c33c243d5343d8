use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::TempDir;

use buildhive_core::builder::BuildDriver;
use buildhive_core::config::Config;
use buildhive_core::error::{Error, Result};
use buildhive_core::pipeline::{BuildMode, Pipeline, PipelineState};
use buildhive_core::project::{Project, ProjectRole, ProjectSet};
use buildhive_core::vcs::{PullOutcome, VcsClient};

/// VCS whose pull emits scripted output per project and can rewrite the
/// project manifest, simulating an incoming dependency change.
struct FakeVcs {
    conflict_in: Option<String>,
    touch_manifest_of: Option<String>,
}

impl FakeVcs {
    fn clean() -> Self {
        Self {
            conflict_in: None,
            touch_manifest_of: None,
        }
    }

    fn with_conflict(project: &str) -> Self {
        Self {
            conflict_in: Some(project.to_string()),
            touch_manifest_of: None,
        }
    }

    fn with_manifest_change(project: &str) -> Self {
        Self {
            conflict_in: None,
            touch_manifest_of: Some(project.to_string()),
        }
    }
}

impl VcsClient for FakeVcs {
    fn revert(&self, _dir: &Path) -> Result<String> {
        Ok(String::new())
    }

    fn pull(&self, dir: &Path) -> PullOutcome {
        let name = dir.file_name().unwrap().to_string_lossy().to_string();
        if self.touch_manifest_of.as_deref() == Some(name.as_str()) {
            fs::write(dir.join("package.json"), "{\"deps\":\"changed\"}").unwrap();
        }
        let output = if self.conflict_in.as_deref() == Some(name.as_str()) {
            "C    src/index.ts\nUpdated to revision 7.\n".to_string()
        } else {
            "At revision 7.\n".to_string()
        };
        PullOutcome {
            output,
            succeeded: true,
            error: None,
        }
    }
}

/// Records every install/build call; configurable failures.
struct FakeDriver {
    calls: Mutex<Vec<String>>,
    fail_builds: HashSet<String>,
    /// Drops the shared output tree on a successful shared build, so
    /// propagation has something real to copy.
    shared_output: Option<PathBuf>,
}

impl FakeDriver {
    fn new(shared_output: Option<PathBuf>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_builds: HashSet::new(),
            shared_output,
        }
    }

    fn failing(mut self, name: &str) -> Self {
        self.fail_builds.insert(name.to_string());
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl BuildDriver for FakeDriver {
    fn install(&self, project: &Project) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("install:{}", project.name));
        Ok(())
    }

    fn build(&self, project: &Project) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("build:{}", project.name));
        if self.fail_builds.contains(&project.name) {
            return Err(Error::CommandFailed {
                project: project.name.clone(),
                message: "'npm run build-all' exited with exit status: 1".to_string(),
            });
        }
        if project.is_shared() {
            if let Some(output) = &self.shared_output {
                fs::create_dir_all(output).unwrap();
                fs::write(output.join("index.js"), "export default 1;").unwrap();
            }
        }
        Ok(())
    }
}

fn setup(temp_dir: &TempDir) -> (Config, ProjectSet) {
    let packages = temp_dir.path().join("packages");
    let mut projects = Vec::new();
    for name in ["hive-lib", "alpha", "beta"] {
        let path = packages.join(name);
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join("package.json"), format!("{{\"name\":\"{}\"}}", name)).unwrap();
        let role = if name.ends_with("-lib") {
            ProjectRole::SharedLibrary
        } else {
            ProjectRole::Platform
        };
        projects.push(Project::new(name.to_string(), path, role));
    }

    let shared = projects.remove(0);
    let mut config = Config::default();
    // Keep a stuck-toolchain poll from slowing the suite down.
    config.gate.poll_interval_ms = 1;
    config.gate.max_attempts = 3;

    (
        config,
        ProjectSet {
            shared,
            platforms: projects,
        },
    )
}

fn idle_probe() -> impl Fn() -> bool {
    || false
}

#[test]
fn test_clean_run_builds_shared_then_platform() {
    let temp_dir = TempDir::new().unwrap();
    let (config, projects) = setup(&temp_dir);
    let vcs = FakeVcs::clean();
    let driver = FakeDriver::new(Some(projects.shared.path.join("dist/@shared")));
    let probe = idle_probe();

    let alpha = projects.platform("alpha").unwrap().clone();
    let selection = vec![&alpha];

    let mut pipeline = Pipeline::new(&config, &vcs, &driver, &probe);
    let report = pipeline
        .run(&projects, &selection, BuildMode::Gated)
        .unwrap();

    assert_eq!(report.state, PipelineState::Done);
    assert!(report.all_built());
    // Fast branch: no install, shared library strictly before the platform.
    assert_eq!(driver.calls(), vec!["build:hive-lib", "build:alpha"]);
    // Propagation happened between the two builds.
    assert!(alpha.path.join("node_modules/@shared/index.js").exists());
}

#[test]
fn test_conflict_aborts_before_any_build() {
    let temp_dir = TempDir::new().unwrap();
    let (config, projects) = setup(&temp_dir);
    // Conflict in beta only; alpha's clean state is irrelevant.
    let vcs = FakeVcs::with_conflict("beta");
    let driver = FakeDriver::new(None);
    let probe = idle_probe();

    let selection: Vec<&Project> = projects.platforms.iter().collect();
    let mut pipeline = Pipeline::new(&config, &vcs, &driver, &probe);
    let report = pipeline
        .run(&projects, &selection, BuildMode::Gated)
        .unwrap();

    assert_eq!(report.state, PipelineState::Aborted);
    assert!(driver.calls().is_empty(), "no builder call may occur");
    let verdict = report.verdict.unwrap();
    assert_eq!(verdict.conflicts.len(), 1);
    assert_eq!(verdict.conflicts[0].project, "beta");
    assert!(!projects.platforms[0]
        .path
        .join("node_modules")
        .exists());
}

#[test]
fn test_manifest_change_runs_full_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    let (config, projects) = setup(&temp_dir);
    let vcs = FakeVcs::with_manifest_change("alpha");
    let driver = FakeDriver::new(Some(projects.shared.path.join("dist/@shared")));
    let probe = idle_probe();

    let alpha = projects.platform("alpha").unwrap().clone();
    let selection = vec![&alpha];

    let mut pipeline = Pipeline::new(&config, &vcs, &driver, &probe);
    let report = pipeline
        .run(&projects, &selection, BuildMode::Gated)
        .unwrap();

    assert_eq!(report.state, PipelineState::Done);
    assert_eq!(
        report.verdict.as_ref().unwrap().changed_manifests,
        vec!["alpha".to_string()]
    );
    // Reinstall covers every sub-project, then builds proceed in order.
    assert_eq!(
        driver.calls(),
        vec![
            "install:hive-lib",
            "install:alpha",
            "install:beta",
            "build:hive-lib",
            "build:alpha",
        ]
    );
}

#[test]
fn test_shared_build_failure_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let (config, projects) = setup(&temp_dir);
    let vcs = FakeVcs::clean();
    let driver = FakeDriver::new(None).failing("hive-lib");
    let probe = idle_probe();

    let selection: Vec<&Project> = projects.platforms.iter().collect();
    let mut pipeline = Pipeline::new(&config, &vcs, &driver, &probe);
    let result = pipeline.run(&projects, &selection, BuildMode::Gated);

    assert!(matches!(result, Err(Error::SharedLibraryBuild { .. })));
    assert_eq!(driver.calls(), vec!["build:hive-lib"]);
}

#[test]
fn test_platform_failure_does_not_stop_siblings() {
    let temp_dir = TempDir::new().unwrap();
    let (config, projects) = setup(&temp_dir);
    let vcs = FakeVcs::clean();
    let driver = FakeDriver::new(Some(projects.shared.path.join("dist/@shared")))
        .failing("alpha");
    let probe = idle_probe();

    let selection: Vec<&Project> = projects.platforms.iter().collect();
    let mut pipeline = Pipeline::new(&config, &vcs, &driver, &probe);
    let report = pipeline
        .run(&projects, &selection, BuildMode::Gated)
        .unwrap();

    assert_eq!(report.state, PipelineState::Done);
    assert!(!report.all_built());
    assert_eq!(
        driver.calls(),
        vec!["build:hive-lib", "build:alpha", "build:beta"]
    );
    let alpha = report.outcomes.iter().find(|o| o.platform == "alpha").unwrap();
    let beta = report.outcomes.iter().find(|o| o.platform == "beta").unwrap();
    assert!(!alpha.success);
    assert!(beta.success);
}

#[test]
fn test_concurrent_mode_builds_every_platform() {
    let temp_dir = TempDir::new().unwrap();
    let (config, projects) = setup(&temp_dir);
    let vcs = FakeVcs::clean();
    let driver = FakeDriver::new(Some(projects.shared.path.join("dist/@shared")));
    let probe = idle_probe();

    let selection: Vec<&Project> = projects.platforms.iter().collect();
    let mut pipeline = Pipeline::new(&config, &vcs, &driver, &probe);
    let report = pipeline
        .run(&projects, &selection, BuildMode::Concurrent)
        .unwrap();

    assert!(report.all_built());
    let calls = driver.calls();
    assert_eq!(calls[0], "build:hive-lib");
    let built: HashSet<&str> = calls[1..].iter().map(String::as_str).collect();
    assert_eq!(built, HashSet::from(["build:alpha", "build:beta"]));
}

#[test]
fn test_empty_selection_is_a_clean_noop() {
    let temp_dir = TempDir::new().unwrap();
    let (config, projects) = setup(&temp_dir);
    let vcs = FakeVcs::clean();
    let driver = FakeDriver::new(None);
    let probe = idle_probe();

    let mut pipeline = Pipeline::new(&config, &vcs, &driver, &probe);
    let report = pipeline.run(&projects, &[], BuildMode::Gated).unwrap();

    assert_eq!(report.state, PipelineState::Done);
    assert!(report.verdict.is_none());
    assert!(driver.calls().is_empty());
}

#[test]
fn test_stuck_toolchain_is_logged_not_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let (config, projects) = setup(&temp_dir);
    let vcs = FakeVcs::clean();
    let driver = FakeDriver::new(Some(projects.shared.path.join("dist/@shared")));
    // Never clears; the gate times out after 3 short polls and the run
    // proceeds anyway.
    let probe = || true;

    let alpha = projects.platform("alpha").unwrap().clone();
    let selection = vec![&alpha];

    let mut pipeline = Pipeline::new(&config, &vcs, &driver, &probe);
    let report = pipeline
        .run(&projects, &selection, BuildMode::Gated)
        .unwrap();

    assert!(report.all_built());
}
