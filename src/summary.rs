/*!
Posterior summaries over the accumulated post-burn-in samples.

Produces per-parameter means, 95% percentile credible intervals, and two
named tail probabilities for the change time: the chance the change falls
after noon (τ > 12h) and within the mid-afternoon window (14h < τ < 16h).
Summarization never mutates the sample sequence; sorting happens on
copies.
*/

use ndarray::Array1;

use crate::config::Params;

/// Lower and upper bound of a percentile credible interval, `lo <= hi`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CredibleInterval {
    pub lo: f64,
    pub hi: f64,
}

/// Posterior summary derived from the post-burn-in samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PosteriorSummary {
    /// Per-parameter arithmetic means.
    pub mean: Params,
    pub ci_tau: CredibleInterval,
    pub ci_mu1: CredibleInterval,
    pub ci_mu2: CredibleInterval,
    /// Fraction of samples with `tau > 12`.
    pub prob_afternoon: f64,
    /// Fraction of samples with `14 < tau < 16`.
    pub prob_mid_afternoon: f64,
}

/// Linear-interpolated percentile over ascending-sorted `sorted`, using
/// the fractional rank `p/100 * (n-1)`.
///
/// `sorted` must be non-empty and `p` in `[0, 100]`; the 0th percentile is
/// the minimum and the 100th the maximum.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    let idx = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = idx.floor() as usize;
    let hi = idx.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (idx - lo as f64) * (sorted[hi] - sorted[lo])
    }
}

/// Summarizes the post-burn-in samples, or `None` when fewer than two
/// exist (percentile intervals are undefined below that).
pub fn summarize(samples: &[Params]) -> Option<PosteriorSummary> {
    if samples.len() < 2 {
        return None;
    }
    let n = samples.len() as f64;

    let tau = Array1::from_iter(samples.iter().map(|s| s.tau));
    let mu1 = Array1::from_iter(samples.iter().map(|s| s.mu1));
    let mu2 = Array1::from_iter(samples.iter().map(|s| s.mu2));

    let mean_of = |values: &Array1<f64>| {
        values
            .mean()
            .expect("Expected mean of a non-empty sample sequence to exist.")
    };
    let ci_of = |values: &Array1<f64>| {
        let mut sorted = values.to_vec();
        sorted.sort_unstable_by(|a, b| a.total_cmp(b));
        CredibleInterval {
            lo: percentile(&sorted, 2.5),
            hi: percentile(&sorted, 97.5),
        }
    };

    let prob_afternoon = samples.iter().filter(|s| s.tau > 12.0).count() as f64 / n;
    let prob_mid_afternoon =
        samples.iter().filter(|s| s.tau > 14.0 && s.tau < 16.0).count() as f64 / n;

    Some(PosteriorSummary {
        mean: Params::new(mean_of(&tau), mean_of(&mu1), mean_of(&mu2)),
        ci_tau: ci_of(&tau),
        ci_mu1: ci_of(&mu1),
        ci_mu2: ci_of(&mu2),
        prob_afternoon,
        prob_mid_afternoon,
    })
}
