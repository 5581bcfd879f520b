//! Random-walk proposal generation for Metropolis steps.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::config::Params;

/// A proposal generator for Metropolis steps.
///
/// Implementations must be symmetric, `q(x'|x) == q(x|x')`, so the
/// proposal-density ratio drops out of the acceptance computation. An
/// asymmetric proposal cannot be substituted without adding that ratio
/// back into the engine's acceptance rule.
pub trait Proposal {
    /// Samples a candidate from `q(· | current)`.
    fn sample(&mut self, current: &Params) -> Params;

    /// Returns this proposal reseeded with `seed`.
    fn set_seed(self, seed: u64) -> Self;
}

/// Perturbs each parameter independently with zero-mean normal noise
/// scaled by that parameter's width.
#[derive(Debug, Clone)]
pub struct RandomWalkProposal {
    pub widths: Params,
    rng: SmallRng,
}

impl RandomWalkProposal {
    pub fn new(widths: Params) -> Self {
        Self {
            widths,
            rng: SmallRng::from_entropy(),
        }
    }

    fn draw(&mut self, width: f64) -> f64 {
        let normal = Normal::new(0.0, width)
            .expect("Expecting creation of normal distribution to succeed.");
        normal.sample(&mut self.rng)
    }
}

impl Proposal for RandomWalkProposal {
    fn sample(&mut self, current: &Params) -> Params {
        Params {
            tau: current.tau + self.draw(self.widths.tau),
            mu1: current.mu1 + self.draw(self.widths.mu1),
            mu2: current.mu2 + self.draw(self.widths.mu2),
        }
    }

    fn set_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }
}
