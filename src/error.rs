//! Error taxonomy for the rostering engine.
//!
//! Infeasible or time-limited solves are never errors — they come back as a
//! `RosterResult { feasible: false, .. }` (see [`crate::result`]). `RosterError`
//! only covers construction-time and configuration problems.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    /// The configured solver backend could not be constructed. Kept live so
    /// the solver adapter stays swappable (spec.md §9) even though the
    /// default, linked-in backend never fails this way in practice.
    #[error("rostering backend unavailable: {0}")]
    BackendUnavailable(String),

    /// A configuration value violates the engine's contract (e.g. a
    /// negative soft weight) and was rejected before a solve was attempted.
    #[error("invalid roster configuration: {0}")]
    InvalidConfiguration(String),

    /// The underlying MILP solver failed to resolve the model for a reason
    /// other than infeasibility (e.g. an internal solver error).
    #[error("solver resolution failed: {0}")]
    Resolution(#[from] good_lp::ResolutionError),
}
