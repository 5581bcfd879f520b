/*!
Run configuration for the change-point sampler.

A [`SamplerConfig`] is assembled once, validated at run start, and frozen
while a run is in progress. [`SamplerConfig::default`] reproduces the
shipped demonstration setup: a signal whose mean rises from 12.3 to 13.2
at τ = 14.5 hours, observed 300 times with noise σ = 0.9.
*/

use crate::error::Error;

/// A point in parameter space: the change time and the two segment means.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Params {
    /// Change time, in hours over the observation domain `[0, 24)`.
    pub tau: f64,
    /// Mean signal level before `tau`.
    pub mu1: f64,
    /// Mean signal level at and after `tau`.
    pub mu2: f64,
}

impl Params {
    pub fn new(tau: f64, mu1: f64, mu2: f64) -> Self {
        Self { tau, mu1, mu2 }
    }
}

/// Independent normal priors on the two segment means.
///
/// `tau` carries an implicitly uniform prior over the observation domain;
/// its density is a constant that cancels in every acceptance ratio, so no
/// field for it exists here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorSpec {
    pub mu1_mean: f64,
    pub mu1_std: f64,
    pub mu2_mean: f64,
    pub mu2_std: f64,
}

/// Immutable per-run settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerConfig {
    /// Post-burn-in sample budget; the chain stops once reached.
    pub total_samples: usize,
    /// Accepted draws discarded before sampling begins.
    pub burn_in_samples: usize,
    /// Number of synthetic observations to generate.
    pub observation_count: usize,
    /// Known noise standard deviation of the observation process.
    pub known_sigma: f64,
    /// Generating parameters for the synthetic dataset, kept for overlays.
    pub true_params: Params,
    pub priors: PriorSpec,
    /// Chain starting point.
    pub initial_params: Params,
    /// Per-parameter random-walk standard deviations.
    pub proposal_widths: Params,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            total_samples: 2000,
            burn_in_samples: 0,
            observation_count: 300,
            known_sigma: 0.9,
            true_params: Params::new(14.5, 12.3, 13.2),
            priors: PriorSpec {
                mu1_mean: 15.0,
                mu1_std: 5.0,
                mu2_mean: 15.0,
                mu2_std: 5.0,
            },
            initial_params: Params::new(12.0, 10.0, 10.0),
            proposal_widths: Params::new(0.35, 0.07, 0.07),
        }
    }
}

impl SamplerConfig {
    /// Checks every field a run depends on. Called once at run start;
    /// nothing re-validates mid-run because the config is frozen.
    pub fn validate(&self) -> Result<(), Error> {
        if self.total_samples == 0 {
            return Err(Error::InvalidConfig("total_samples must be positive"));
        }
        if self.observation_count == 0 {
            return Err(Error::InvalidConfig("observation_count must be positive"));
        }
        if !(self.known_sigma > 0.0) {
            return Err(Error::InvalidConfig("known_sigma must be positive"));
        }
        if !(self.proposal_widths.tau > 0.0)
            || !(self.proposal_widths.mu1 > 0.0)
            || !(self.proposal_widths.mu2 > 0.0)
        {
            return Err(Error::InvalidConfig("proposal widths must be positive"));
        }
        if !(self.priors.mu1_std > 0.0) || !(self.priors.mu2_std > 0.0) {
            return Err(Error::InvalidConfig("prior standard deviations must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        SamplerConfig::default()
            .validate()
            .expect("Expected the shipped default configuration to validate.");
    }

    #[test]
    fn rejects_zero_total_samples() {
        let config = SamplerConfig {
            total_samples: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(Error::InvalidConfig("total_samples must be positive"))
        );
    }

    #[test]
    fn rejects_zero_observation_count() {
        let config = SamplerConfig {
            observation_count: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_sigma() {
        for sigma in [0.0, -0.9, f64::NAN] {
            let config = SamplerConfig {
                known_sigma: sigma,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "sigma={sigma} should be rejected");
        }
    }

    #[test]
    fn rejects_non_positive_proposal_width() {
        let mut config = SamplerConfig::default();
        config.proposal_widths.mu2 = 0.0;
        assert_eq!(
            config.validate(),
            Err(Error::InvalidConfig("proposal widths must be positive"))
        );
    }

    #[test]
    fn rejects_non_positive_prior_std() {
        let mut config = SamplerConfig::default();
        config.priors.mu1_std = -1.0;
        assert!(config.validate().is_err());
    }
}
