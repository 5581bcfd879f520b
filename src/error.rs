//! Error types for the sampler.
//!
//! Configuration problems are caught once, at run start. Protocol errors
//! (calling propose/resolve out of order) indicate caller bugs and are
//! reported explicitly rather than papered over. Numerical edge cases in
//! the acceptance computation are clamped internally and never surface
//! here.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A configuration field failed validation at run start.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// A run is in progress; the configuration is frozen and a second run
    /// cannot start until [`reset`](crate::session::Session::reset).
    #[error("a run is already in progress")]
    RunInProgress,

    /// A step operation was attempted with no run in progress.
    #[error("no run in progress; call start first")]
    NotStarted,

    /// A proposal is already pending and must be resolved before the next
    /// one can be drawn.
    #[error("a proposal is already pending; resolve it first")]
    ProposalPending,

    /// Resolve was called with no pending proposal.
    #[error("no proposal is pending; propose first")]
    NoPendingProposal,

    /// The post-burn-in sample budget has been reached; the chain refuses
    /// further proposals. The final state stays inspectable.
    #[error("sampling is complete; the sample budget has been reached")]
    ChainComplete,
}
