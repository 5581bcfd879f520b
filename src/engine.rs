/*!
# Metropolis-Hastings stepping engine

Drives one change-point chain through the propose → evaluate → resolve
cycle, either one explicit step at a time (for interactive inspection) or
through a pull-based auto-run iterator.

## Step protocol

[`Engine::propose_step`] draws a candidate, evaluates the log-posterior of
the current and candidate states, and leaves a [`StepResult`] pending.
[`Engine::resolve_step`] consumes the pending result, flips the Metropolis
coin, and records the draw. [`Engine::step`] chains both for auto mode.
Every operation either fully applies or leaves state untouched; a failed
call never partially mutates the chain.

## Recording convention

Only accepted draws are recorded. A rejected proposal leaves the chain
where it was and appends nothing; mixing quality is reported through the
acceptance rate instead of repeated copies of the current state. The
sample count therefore equals the accepted-draw count, not the step count.

## Example

```rust
use changepoint_mh::config::SamplerConfig;
use changepoint_mh::engine::{CancelToken, Engine};

let config = SamplerConfig {
    total_samples: 50,
    ..Default::default()
};
let mut engine = Engine::start_run_seeded(config, 42).unwrap();
let snapshots: Vec<_> = engine.run_auto(CancelToken::new()).collect();

assert!(engine.is_complete());
assert_eq!(engine.state().samples.len(), 50);
assert_eq!(snapshots.last().unwrap().sample_len, 50);
```
*/

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{thread_rng, Rng, SeedableRng};

use crate::config::{Params, SamplerConfig};
use crate::data::{generate_dataset, DataPoint};
use crate::error::Error;
use crate::model::{ChangePointPosterior, Target};
use crate::proposal::{Proposal, RandomWalkProposal};
use crate::summary::{self, PosteriorSummary};

/// Which stretch of the run the chain is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Accepted draws go to the burn-in sequence and are excluded from
    /// posterior summaries.
    BurnIn,
    /// Accepted draws count toward the post-burn-in sample budget.
    Sampling,
    /// The budget is reached; further proposals are refused.
    Complete,
}

/// Evaluation of one proposed move, held between propose and resolve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    pub proposed: Params,
    pub log_posterior_current: f64,
    pub log_posterior_proposed: f64,
    /// `log_posterior_proposed - log_posterior_current`.
    pub log_ratio: f64,
    /// `min(1, exp(log_ratio))`, clamped to `[0, 1]`.
    pub acceptance_probability: f64,
}

/// Accumulated chain history.
///
/// Owned exclusively by the engine and mutated only between the caller's
/// step invocations; observers see it through shared references taken
/// between steps.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainState {
    /// Most recently accepted parameter vector.
    pub current: Params,
    /// Accepted draws made during burn-in, in chain order. Stops growing
    /// once it reaches the burn-in budget.
    pub burn_in: Vec<Params>,
    /// Accepted post-burn-in draws, in chain order. Feeds the trace and
    /// the posterior summaries.
    pub samples: Vec<Params>,
    /// Proposals evaluated so far, accepted or not.
    pub total_steps: u64,
    /// Proposals accepted so far. Never exceeds `total_steps`.
    pub accepted_count: u64,
    pub phase: Phase,
}

impl ChainState {
    fn new(initial: Params, burn_in_budget: usize) -> Self {
        let phase = if burn_in_budget == 0 {
            Phase::Sampling
        } else {
            Phase::BurnIn
        };
        Self {
            current: initial,
            burn_in: Vec::with_capacity(burn_in_budget),
            samples: Vec::new(),
            total_steps: 0,
            accepted_count: 0,
            phase,
        }
    }

    /// Fraction of evaluated proposals that were accepted, in `[0, 1]`.
    pub fn acceptance_rate(&self) -> f64 {
        if self.total_steps == 0 {
            0.0
        } else {
            self.accepted_count as f64 / self.total_steps as f64
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            current: self.current,
            phase: self.phase,
            total_steps: self.total_steps,
            accepted_count: self.accepted_count,
            burn_in_len: self.burn_in.len(),
            sample_len: self.samples.len(),
        }
    }
}

/// Point-in-time view of chain progress, cheap enough to emit once per
/// auto-run step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub current: Params,
    pub phase: Phase,
    pub total_steps: u64,
    pub accepted_count: u64,
    pub burn_in_len: usize,
    pub sample_len: usize,
}

/// Metropolis acceptance probability `min(1, exp(log_ratio))`.
///
/// Clamped so that arbitrarily large ratios map to 1, arbitrarily negative
/// ones to 0, and a NaN ratio (possible only from degenerate inputs) to 0,
/// without overflow.
pub fn acceptance_probability(log_ratio: f64) -> f64 {
    if log_ratio.is_nan() {
        0.0
    } else if log_ratio >= 0.0 {
        1.0
    } else {
        log_ratio.exp()
    }
}

/// A single change-point Markov chain with explicit step control.
///
/// Generic over the proposal type the way the sampler seams are drawn
/// elsewhere in the crate; [`Engine::start_run`] fixes it to the standard
/// per-parameter random walk.
#[derive(Debug, Clone)]
pub struct Engine<Q: Proposal = RandomWalkProposal> {
    config: SamplerConfig,
    target: ChangePointPosterior,
    proposal: Q,
    state: ChainState,
    pending: Option<StepResult>,
    /// Drives the accept/reject draw, in manual and auto mode alike.
    rng: SmallRng,
    seed: u64,
}

impl Engine<RandomWalkProposal> {
    /// Validates `config`, generates the synthetic dataset, and starts a
    /// fresh chain at `config.initial_params` with an entropy seed.
    pub fn start_run(config: SamplerConfig) -> Result<Self, Error> {
        let seed = thread_rng().gen::<u64>();
        Self::start_run_seeded(config, seed)
    }

    /// Like [`Engine::start_run`] with a fixed seed, so the dataset and
    /// the whole chain trajectory are reproducible.
    pub fn start_run_seeded(config: SamplerConfig, seed: u64) -> Result<Self, Error> {
        let proposal = RandomWalkProposal::new(config.proposal_widths);
        Self::with_proposal(config, proposal, seed)
    }
}

impl<Q: Proposal> Engine<Q> {
    /// Starts a run with a caller-supplied proposal generator.
    pub fn with_proposal(config: SamplerConfig, proposal: Q, seed: u64) -> Result<Self, Error> {
        config.validate()?;
        let mut rng = SmallRng::seed_from_u64(seed);
        let data = generate_dataset(
            &config.true_params,
            config.known_sigma,
            config.observation_count,
            &mut rng,
        );
        let target = ChangePointPosterior {
            data,
            priors: config.priors,
            sigma: config.known_sigma,
        };
        let state = ChainState::new(config.initial_params, config.burn_in_samples);
        Ok(Self {
            config,
            target,
            proposal: proposal.set_seed(seed.wrapping_add(1)),
            state,
            pending: None,
            rng,
            seed,
        })
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn state(&self) -> &ChainState {
        &self.state
    }

    /// The synthetic dataset this run infers from.
    pub fn data(&self) -> &[DataPoint] {
        &self.target.data
    }

    /// The proposal awaiting resolution, if any.
    pub fn pending(&self) -> Option<&StepResult> {
        self.pending.as_ref()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn is_complete(&self) -> bool {
        self.state.phase == Phase::Complete
    }

    /// Draws and evaluates a candidate, leaving it pending for
    /// [`Engine::resolve_step`].
    ///
    /// Fails with [`Error::ChainComplete`] once the sample budget is
    /// reached and [`Error::ProposalPending`] if an unresolved proposal
    /// exists; neither failure touches the chain.
    pub fn propose_step(&mut self) -> Result<StepResult, Error> {
        if self.is_complete() {
            return Err(Error::ChainComplete);
        }
        if self.pending.is_some() {
            return Err(Error::ProposalPending);
        }

        let proposed = self.proposal.sample(&self.state.current);
        let log_posterior_current = self.target.unnorm_log_prob(&self.state.current);
        let log_posterior_proposed = self.target.unnorm_log_prob(&proposed);
        let log_ratio = log_posterior_proposed - log_posterior_current;
        let step = StepResult {
            proposed,
            log_posterior_current,
            log_posterior_proposed,
            log_ratio,
            acceptance_probability: acceptance_probability(log_ratio),
        };
        self.pending = Some(step);
        Ok(step)
    }

    /// Resolves the pending proposal with a uniform draw and records the
    /// outcome. Returns whether the candidate was accepted.
    ///
    /// Fails with [`Error::NoPendingProposal`] if nothing is pending.
    pub fn resolve_step(&mut self) -> Result<bool, Error> {
        let step = self.pending.take().ok_or(Error::NoPendingProposal)?;
        let u: f64 = self.rng.gen();
        let accepted = u < step.acceptance_probability;

        self.state.total_steps += 1;
        if accepted {
            self.state.accepted_count += 1;
            self.state.current = step.proposed;
            self.record(step.proposed);
        }
        Ok(accepted)
    }

    /// One full propose-evaluate-resolve cycle.
    ///
    /// A proposal left pending by manual stepping is resolved first, so
    /// switching to auto mode never discards progress.
    pub fn step(&mut self) -> Result<bool, Error> {
        if self.pending.is_none() {
            self.propose_step()?;
        }
        self.resolve_step()
    }

    /// Returns a pull-based iterator performing one full step per `next`
    /// call and yielding a snapshot after each.
    ///
    /// The iterator ends when the sample budget is reached or `cancel` is
    /// triggered; cancellation is observed between steps, never mid-step,
    /// and already-recorded steps are kept. The caller owns the pacing —
    /// a timer, a tight loop, or a test harness all work.
    pub fn run_auto(&mut self, cancel: CancelToken) -> AutoRun<'_, Q> {
        AutoRun {
            engine: self,
            cancel,
        }
    }

    /// Posterior summary over the post-burn-in samples; `None` until at
    /// least two samples exist.
    pub fn summarize(&self) -> Option<PosteriorSummary> {
        summary::summarize(&self.state.samples)
    }

    fn record(&mut self, draw: Params) {
        match self.state.phase {
            Phase::BurnIn => {
                self.state.burn_in.push(draw);
                if self.state.burn_in.len() >= self.config.burn_in_samples {
                    self.state.phase = Phase::Sampling;
                }
            }
            Phase::Sampling => {
                self.state.samples.push(draw);
                if self.state.samples.len() >= self.config.total_samples {
                    self.state.phase = Phase::Complete;
                }
            }
            // Unreachable in practice: proposing is refused once complete.
            Phase::Complete => {}
        }
    }
}

/// Cooperative cancellation flag for auto runs, checked between steps.
///
/// Clones share the flag, so one handle can be kept by the caller while
/// another rides along with the running iterator.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Iterator returned by [`Engine::run_auto`]: one completed step and one
/// [`Snapshot`] per `next` call. Finite; a fresh run requires starting a
/// new engine.
#[derive(Debug)]
pub struct AutoRun<'a, Q: Proposal = RandomWalkProposal> {
    engine: &'a mut Engine<Q>,
    cancel: CancelToken,
}

impl<Q: Proposal> Iterator for AutoRun<'_, Q> {
    type Item = Snapshot;

    fn next(&mut self) -> Option<Snapshot> {
        if self.cancel.is_cancelled() || self.engine.is_complete() {
            return None;
        }
        match self.engine.step() {
            Ok(_) => Some(self.engine.state.snapshot()),
            Err(_) => None,
        }
    }
}
