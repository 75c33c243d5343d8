//! Platform selection providers.

use crate::error::{Error, Result};
use crate::project::Project;

/// How the set of platforms for a run gets chosen. The pipeline itself never
/// touches interactive I/O; the CLI plugs a prompting provider in here when
/// no arguments were given.
pub trait SelectionProvider {
    /// Picks from `platforms`. An empty result is a valid no-op run.
    fn select<'a>(&self, platforms: &'a [Project]) -> Result<Vec<&'a Project>>;
}

/// Explicit names from the command line, resolved in the order given.
pub struct ArgsSelection {
    names: Vec<String>,
}

impl ArgsSelection {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }
}

impl SelectionProvider for ArgsSelection {
    fn select<'a>(&self, platforms: &'a [Project]) -> Result<Vec<&'a Project>> {
        self.names
            .iter()
            .map(|name| {
                platforms
                    .iter()
                    .find(|p| &p.name == name)
                    .ok_or_else(|| Error::ProjectNotFound {
                        name: name.clone(),
                        available: platforms
                            .iter()
                            .map(|p| p.name.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            })
            .collect()
    }
}

/// Every platform, in discovery order.
pub struct AllSelection;

impl SelectionProvider for AllSelection {
    fn select<'a>(&self, platforms: &'a [Project]) -> Result<Vec<&'a Project>> {
        Ok(platforms.iter().collect())
    }
}
