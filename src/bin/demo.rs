//! A small demo driving the change-point sampler to completion in auto
//! mode, with a progress bar, then printing the posterior summary next to
//! the generating truth.

use changepoint_mh::config::SamplerConfig;
use changepoint_mh::engine::CancelToken;
use changepoint_mh::session::Session;

use indicatif::{ProgressBar, ProgressStyle};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    const SEED: u64 = 42;

    let config = SamplerConfig {
        burn_in_samples: 500,
        ..Default::default()
    };
    let truth = config.true_params;
    let budget = (config.burn_in_samples + config.total_samples) as u64;

    let mut session = Session::with_config(config);
    session.start_seeded(SEED)?;

    let pb = ProgressBar::new(budget);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?
            .progress_chars("##-"),
    );

    for snapshot in session.run_auto(CancelToken::new())? {
        pb.set_position(snapshot.burn_in_len as u64 + snapshot.sample_len as u64);
    }
    pb.finish_with_message("Done!");

    let state = session.state().expect("run finished, state available");
    println!(
        "Evaluated {} proposals, accepted {} ({:.1}%)",
        state.total_steps,
        state.accepted_count,
        state.acceptance_rate() * 100.0
    );

    let summary = session
        .summarize()
        .expect("completed run has enough samples to summarize");
    println!(
        "tau: {:.3}h  [{:.3}, {:.3}]  (truth {:.3})",
        summary.mean.tau, summary.ci_tau.lo, summary.ci_tau.hi, truth.tau
    );
    println!(
        "mu1: {:.3}   [{:.3}, {:.3}]  (truth {:.3})",
        summary.mean.mu1, summary.ci_mu1.lo, summary.ci_mu1.hi, truth.mu1
    );
    println!(
        "mu2: {:.3}   [{:.3}, {:.3}]  (truth {:.3})",
        summary.mean.mu2, summary.ci_mu2.lo, summary.ci_mu2.hi, truth.mu2
    );
    println!(
        "P(change after noon) = {:.3}, P(change in 14h-16h) = {:.3}",
        summary.prob_afternoon, summary.prob_mid_afternoon
    );

    Ok(())
}
