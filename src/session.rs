/*!
Run lifecycle surface for interactive callers.

A [`Session`] owns the editable configuration and, while a run is in
progress, the [`Engine`] driving it. It is the crate's equivalent of the
IDLE ↔ running state machine a presentation layer talks to: configuration
is editable only while idle, frozen the moment a run starts, and editable
again after [`Session::reset`]. No hidden global state is involved; a
session is an ordinary value the caller owns and passes around.
*/

use crate::config::SamplerConfig;
use crate::engine::{AutoRun, CancelToken, ChainState, Engine, StepResult};
use crate::error::Error;
use crate::summary::PosteriorSummary;

/// Owns the configuration and at most one run at a time.
#[derive(Debug, Clone, Default)]
pub struct Session {
    config: SamplerConfig,
    engine: Option<Engine>,
}

impl Session {
    /// A fresh idle session with the shipped default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SamplerConfig) -> Self {
        Self {
            config,
            engine: None,
        }
    }

    /// True when no run is in progress and the configuration is editable.
    pub fn is_idle(&self) -> bool {
        self.engine.is_none()
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Replaces the configuration. Fails while a run is in progress; the
    /// active run's configuration is frozen.
    pub fn set_config(&mut self, config: SamplerConfig) -> Result<(), Error> {
        if !self.is_idle() {
            return Err(Error::RunInProgress);
        }
        self.config = config;
        Ok(())
    }

    /// Validates the configuration, generates the dataset, and starts a
    /// chain at the configured initial parameters.
    pub fn start(&mut self) -> Result<&ChainState, Error> {
        if !self.is_idle() {
            return Err(Error::RunInProgress);
        }
        let engine = Engine::start_run(self.config.clone())?;
        Ok(self.engine.insert(engine).state())
    }

    /// Like [`Session::start`] with a fixed seed for reproducible runs.
    pub fn start_seeded(&mut self, seed: u64) -> Result<&ChainState, Error> {
        if !self.is_idle() {
            return Err(Error::RunInProgress);
        }
        let engine = Engine::start_run_seeded(self.config.clone(), seed)?;
        Ok(self.engine.insert(engine).state())
    }

    /// Discards any run in progress and returns to idle. Idempotent:
    /// resetting an idle session is a no-op.
    pub fn reset(&mut self) {
        self.engine = None;
    }

    /// The running engine, for read access to its state and dataset.
    pub fn engine(&self) -> Option<&Engine> {
        self.engine.as_ref()
    }

    pub fn state(&self) -> Option<&ChainState> {
        self.engine.as_ref().map(Engine::state)
    }

    /// Draws and evaluates the next candidate (manual mode).
    pub fn propose(&mut self) -> Result<StepResult, Error> {
        self.engine_mut()?.propose_step()
    }

    /// Resolves the pending candidate (manual mode); returns whether it
    /// was accepted.
    pub fn resolve(&mut self) -> Result<bool, Error> {
        self.engine_mut()?.resolve_step()
    }

    /// One full propose-evaluate-resolve cycle.
    pub fn step(&mut self) -> Result<bool, Error> {
        self.engine_mut()?.step()
    }

    /// Steps to completion (or cancellation), yielding one snapshot per
    /// completed step. The session stays in the running state afterwards
    /// so the final chain remains inspectable; call [`Session::reset`] to
    /// return to idle.
    pub fn run_auto(&mut self, cancel: CancelToken) -> Result<AutoRun<'_>, Error> {
        Ok(self.engine_mut()?.run_auto(cancel))
    }

    /// Posterior summary of the run in progress, if at least two
    /// post-burn-in samples exist.
    pub fn summarize(&self) -> Option<PosteriorSummary> {
        self.engine.as_ref().and_then(Engine::summarize)
    }

    fn engine_mut(&mut self) -> Result<&mut Engine, Error> {
        self.engine.as_mut().ok_or(Error::NotStarted)
    }
}
