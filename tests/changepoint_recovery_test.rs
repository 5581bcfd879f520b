//! End-to-end tests running the sampler to completion over synthetic data
//! and checking that the posterior recovers the generating parameters.

use changepoint_mh::config::SamplerConfig;
use changepoint_mh::engine::{CancelToken, Engine, Phase};
use changepoint_mh::session::Session;

#[test]
fn auto_run_fills_exactly_the_sample_budget() {
    const SEED: u64 = 42;

    let config = SamplerConfig {
        total_samples: 2000,
        burn_in_samples: 0,
        ..Default::default()
    };
    let mut engine = Engine::start_run_seeded(config, SEED).unwrap();
    let last = engine
        .run_auto(CancelToken::new())
        .last()
        .expect("Expected at least one auto-run step.");

    assert_eq!(last.phase, Phase::Complete);
    assert_eq!(engine.state().samples.len(), 2000);
    assert!(engine.state().total_steps >= 2000);
    assert_eq!(
        engine.state().accepted_count as usize,
        engine.state().samples.len()
    );
}

#[test]
fn posterior_recovers_generating_parameters() {
    const SEED: u64 = 42;

    // Burn-in lets the chain walk in from the deliberately poor starting
    // point before samples count toward the summary.
    let config = SamplerConfig {
        total_samples: 2000,
        burn_in_samples: 500,
        ..Default::default()
    };
    let truth = config.true_params;

    let mut session = Session::with_config(config);
    session.start_seeded(SEED).unwrap();
    let steps = session.run_auto(CancelToken::new()).unwrap().count();
    assert!(steps >= 2500);

    let summary = session
        .summarize()
        .expect("Expected a summary after a completed run.");

    assert!(
        (summary.mean.tau - truth.tau).abs() < 1.5,
        "tau estimate {} too far from truth {}",
        summary.mean.tau,
        truth.tau
    );
    assert!(
        (summary.mean.mu1 - truth.mu1).abs() < 0.3,
        "mu1 estimate {} too far from truth {}",
        summary.mean.mu1,
        truth.mu1
    );
    assert!(
        (summary.mean.mu2 - truth.mu2).abs() < 0.3,
        "mu2 estimate {} too far from truth {}",
        summary.mean.mu2,
        truth.mu2
    );

    assert!(summary.ci_tau.lo <= summary.mean.tau && summary.mean.tau <= summary.ci_tau.hi);
    assert!(summary.ci_mu1.lo <= summary.ci_mu1.hi);
    assert!(summary.ci_mu2.lo <= summary.ci_mu2.hi);

    // The change sits mid-afternoon in the generating truth, so most
    // posterior mass should agree.
    assert!(summary.prob_afternoon > 0.9);

    let state = session.state().unwrap();
    let rate = state.acceptance_rate();
    assert!(rate > 0.0 && rate <= 1.0);
}

#[test]
fn manual_and_auto_stepping_mix_without_losing_progress() {
    let config = SamplerConfig {
        total_samples: 100,
        burn_in_samples: 10,
        observation_count: 50,
        ..Default::default()
    };
    let mut session = Session::with_config(config);
    session.start_seeded(7).unwrap();

    // A few manual cycles first.
    for _ in 0..5 {
        session.propose().unwrap();
        session.resolve().unwrap();
    }
    assert_eq!(session.state().unwrap().total_steps, 5);

    // Then hand over to auto mode until the budget is reached.
    session.run_auto(CancelToken::new()).unwrap().for_each(drop);

    let state = session.state().unwrap();
    assert_eq!(state.phase, Phase::Complete);
    assert_eq!(state.samples.len(), 100);
    assert_eq!(state.burn_in.len(), 10);
}
