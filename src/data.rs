//! Synthetic dataset generation for the change-point demonstration.
//!
//! Observation times are evenly spaced over `[0, TIME_DOMAIN)`; values are
//! normal draws around the segment mean implied by the generating
//! parameters. The dataset is produced once per run start, never per step.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::config::Params;

/// Span of the observation time domain, in hours.
pub const TIME_DOMAIN: f64 = 24.0;

/// One noisy observation of the signal, immutable once generated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataPoint {
    pub time: f64,
    pub value: f64,
}

/// Generates `count` observations from the two-segment model defined by
/// `truth` with noise standard deviation `sigma`.
///
/// An observation at exactly `truth.tau` belongs to the post-change
/// segment, the same tie rule the likelihood applies.
pub fn generate_dataset<R: Rng>(
    truth: &Params,
    sigma: f64,
    count: usize,
    rng: &mut R,
) -> Vec<DataPoint> {
    let noise = Normal::new(0.0, sigma)
        .expect("Expecting creation of normal distribution to succeed.");
    (0..count)
        .map(|i| {
            let time = i as f64 / count as f64 * TIME_DOMAIN;
            let mean = if time < truth.tau { truth.mu1 } else { truth.mu2 };
            DataPoint {
                time,
                value: mean + noise.sample(rng),
            }
        })
        .collect()
}
