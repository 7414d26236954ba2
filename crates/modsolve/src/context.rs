//! Per-run resolution state

use std::fmt;

use crate::config::ResolverConfig;
use crate::error::{ResolverError, Result};
use crate::package::Environment;

/// Phase of a resolution run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    /// Finders may still be registered and drained
    Collecting,
    /// Discovery tasks are running; candidate sets still grow
    Discovering,
    /// Candidate sets are frozen and the solver is running
    Resolving,
    /// A result was produced
    Resolved,
    /// The run failed; the context cannot be reused
    Failed,
}

impl fmt::Display for ContextState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContextState::Collecting => "collecting",
            ContextState::Discovering => "discovering",
            ContextState::Resolving => "resolving",
            ContextState::Resolved => "resolved",
            ContextState::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Explicit state for one resolution run.
///
/// Moves strictly forward through `Collecting → Discovering → Resolving →
/// Resolved`; any other transition is a [`ResolverError::Lifecycle`] error,
/// so a context can produce at most one result.
#[derive(Debug, Clone)]
pub struct ResolutionContext {
    config: ResolverConfig,
    state: ContextState,
}

impl ResolutionContext {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            state: ContextState::Collecting,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn environment(&self) -> Environment {
        self.config.environment
    }

    pub fn state(&self) -> ContextState {
        self.state
    }

    /// Candidate sets may no longer change
    pub fn is_frozen(&self) -> bool {
        matches!(self.state, ContextState::Resolving | ContextState::Resolved)
    }

    pub fn begin_discovery(&mut self) -> Result<()> {
        self.transition(ContextState::Collecting, ContextState::Discovering)
    }

    pub fn begin_resolution(&mut self) -> Result<()> {
        self.transition(ContextState::Discovering, ContextState::Resolving)
    }

    pub fn finish(&mut self) -> Result<()> {
        self.transition(ContextState::Resolving, ContextState::Resolved)
    }

    pub fn fail(&mut self) {
        self.state = ContextState::Failed;
    }

    fn transition(&mut self, from: ContextState, to: ContextState) -> Result<()> {
        if self.state != from {
            return Err(match self.state {
                ContextState::Resolved | ContextState::Failed => ResolverError::Lifecycle(format!(
                    "this context already finished ({}); create a new one to resolve again",
                    self.state
                )),
                current => ResolverError::Lifecycle(format!(
                    "cannot move from {} to {}",
                    current, to
                )),
            });
        }
        log::trace!("Resolution context: {} -> {}", from, to);
        self.state = to;
        Ok(())
    }
}

impl Default for ResolutionContext {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}
