/*!
Likelihood, priors, and posterior evaluation for the two-segment
change-point model.

The observation model is `value ~ Normal(mu1, sigma)` for `time < tau` and
`Normal(mu2, sigma)` for `time >= tau`; the change time itself belongs to
the post-change segment. Evaluation is pure: the same parameters, dataset,
and priors always produce bit-identical log-densities.

Log-densities keep their full normalizing constants. They would cancel in
every acceptance ratio, but raw log-posterior values are surfaced per step
for inspection, so the constants must be present for those readouts to be
faithful.
*/

use num_traits::Float;

use crate::config::{Params, PriorSpec};
use crate::data::DataPoint;

/// Natural-log normal density: `-0.5*ln(2π) - ln(σ) - 0.5*((x-μ)/σ)²`.
pub fn normal_log_pdf<T: Float>(x: T, mean: T, std: T) -> T {
    let half = T::from(0.5).unwrap();
    let two_pi = T::from(2.0 * std::f64::consts::PI).unwrap();
    let z = (x - mean) / std;
    -half * two_pi.ln() - std.ln() - half * z * z
}

/// A target distribution evaluated up to its normalizing constant.
pub trait Target {
    /// Returns the unnormalized log-density at `theta`.
    fn unnorm_log_prob(&self, theta: &Params) -> f64;
}

/// The change-point posterior over a fixed dataset: two-segment normal
/// likelihood plus independent normal priors on the segment means.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangePointPosterior {
    pub data: Vec<DataPoint>,
    pub priors: PriorSpec,
    /// Known noise standard deviation of the observation process.
    pub sigma: f64,
}

impl ChangePointPosterior {
    /// Sum of normal log-densities over all observations, each centered on
    /// the segment mean its time falls under.
    pub fn log_likelihood(&self, theta: &Params) -> f64 {
        self.data
            .iter()
            .map(|p| {
                let mean = if p.time < theta.tau { theta.mu1 } else { theta.mu2 };
                normal_log_pdf(p.value, mean, self.sigma)
            })
            .sum()
    }

    /// Log-density of the priors on `mu1` and `mu2`.
    ///
    /// `tau`'s uniform prior contributes only a constant, omitted because
    /// both sides of every log-ratio share it.
    pub fn log_prior(&self, theta: &Params) -> f64 {
        normal_log_pdf(theta.mu1, self.priors.mu1_mean, self.priors.mu1_std)
            + normal_log_pdf(theta.mu2, self.priors.mu2_mean, self.priors.mu2_std)
    }
}

impl Target for ChangePointPosterior {
    fn unnorm_log_prob(&self, theta: &Params) -> f64 {
        self.log_likelihood(theta) + self.log_prior(theta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn posterior(data: Vec<DataPoint>) -> ChangePointPosterior {
        ChangePointPosterior {
            data,
            priors: PriorSpec {
                mu1_mean: 15.0,
                mu1_std: 5.0,
                mu2_mean: 15.0,
                mu2_std: 5.0,
            },
            sigma: 0.9,
        }
    }

    #[test]
    fn standard_normal_log_pdf_at_zero() {
        // -0.5 * ln(2π)
        assert_abs_diff_eq!(
            normal_log_pdf(0.0f64, 0.0, 1.0),
            -0.9189385332046727,
            epsilon = 1e-15
        );
    }

    #[test]
    fn normal_log_pdf_matches_closed_form() {
        let lp = normal_log_pdf(2.0f64, 1.0, 0.5);
        let expected = -0.5 * (2.0 * std::f64::consts::PI).ln() - 0.5f64.ln() - 0.5 * 4.0;
        assert_abs_diff_eq!(lp, expected, epsilon = 1e-15);
    }

    #[test]
    fn observation_at_change_time_uses_post_change_mean() {
        let target = posterior(vec![DataPoint {
            time: 5.0,
            value: 10.0,
        }]);
        let theta = Params::new(5.0, 100.0, 10.0);
        // With the tie assigned to mu2 the single point sits exactly on its
        // segment mean; under mu1 it would be wildly unlikely.
        assert_abs_diff_eq!(
            target.log_likelihood(&theta),
            normal_log_pdf(10.0, 10.0, 0.9),
            epsilon = 1e-15
        );
    }

    #[test]
    fn log_posterior_is_deterministic() {
        let target = posterior(vec![
            DataPoint {
                time: 1.0,
                value: 12.1,
            },
            DataPoint {
                time: 20.0,
                value: 13.4,
            },
        ]);
        let theta = Params::new(14.5, 12.3, 13.2);
        let first = target.unnorm_log_prob(&theta);
        for _ in 0..10 {
            assert_eq!(first.to_bits(), target.unnorm_log_prob(&theta).to_bits());
        }
    }

    #[test]
    fn log_prior_sums_both_mean_densities() {
        let target = posterior(vec![]);
        let theta = Params::new(14.5, 12.3, 13.2);
        let expected =
            normal_log_pdf(12.3, 15.0, 5.0) + normal_log_pdf(13.2, 15.0, 5.0);
        assert_abs_diff_eq!(target.log_prior(&theta), expected, epsilon = 1e-15);
    }
}
