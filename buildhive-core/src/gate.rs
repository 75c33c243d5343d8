//! Readiness gate for a shared external toolchain resource.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::config::GateConfig;
use crate::error::{Error, Result};

/// Answers "is the gated resource still busy?".
///
/// Both built-in probes are best-effort, not authoritative: process names
/// collide and lock files can be stale. The gate only delays work, it never
/// proves exclusivity.
pub trait ProcessProbe {
    fn is_busy(&self) -> bool;
}

impl<F: Fn() -> bool> ProcessProbe for F {
    fn is_busy(&self) -> bool {
        self()
    }
}

/// Scans the host process table (`/proc/<pid>/comm`) for an exact name match.
pub struct NameProbe {
    name: String,
}

impl NameProbe {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ProcessProbe for NameProbe {
    fn is_busy(&self) -> bool {
        let entries = match std::fs::read_dir("/proc") {
            Ok(entries) => entries,
            Err(_) => return false,
        };

        for entry in entries.filter_map(|e| e.ok()) {
            let is_pid = entry
                .file_name()
                .to_string_lossy()
                .chars()
                .all(|c| c.is_ascii_digit());
            if !is_pid {
                continue;
            }
            if let Ok(comm) = std::fs::read_to_string(entry.path().join("comm")) {
                if comm.trim() == self.name {
                    return true;
                }
            }
        }
        false
    }
}

/// Treats the presence of a toolchain lock file as busy. Preferred over the
/// process-table scan where the gated tool exposes one.
pub struct LockFileProbe {
    path: PathBuf,
}

impl LockFileProbe {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ProcessProbe for LockFileProbe {
    fn is_busy(&self) -> bool {
        self.path.exists()
    }
}

/// Builds the configured probe: lock file when set, process table otherwise.
pub fn probe_from_config(config: &GateConfig) -> Box<dyn ProcessProbe + Sync> {
    match &config.lock_file {
        Some(path) => Box::new(LockFileProbe::new(path)),
        None => Box::new(NameProbe::new(config.process.clone())),
    }
}

/// Blocks until the probe reports idle, polling at a fixed interval up to a
/// retry ceiling. Never kills the watched process; on timeout the caller
/// decides whether to proceed or stop.
pub struct ReadinessGate {
    interval: Duration,
    max_attempts: u32,
}

impl ReadinessGate {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    pub fn from_config(config: &GateConfig) -> Self {
        Self::new(
            Duration::from_millis(config.poll_interval_ms),
            config.max_attempts,
        )
    }

    /// Returns once the probe reports idle.
    ///
    /// # Errors
    ///
    /// `Error::ProcessStuck` after the retry ceiling is exhausted.
    pub fn wait(&self, probe: &dyn ProcessProbe, label: &str) -> Result<()> {
        for attempt in 0..self.max_attempts {
            if !probe.is_busy() {
                if attempt > 0 {
                    debug!("'{}' became idle after {} polls", label, attempt);
                }
                return Ok(());
            }
            std::thread::sleep(self.interval);
        }

        Err(Error::ProcessStuck {
            process: label.to_string(),
            waited_secs: (self.interval * self.max_attempts).as_secs(),
        })
    }
}
