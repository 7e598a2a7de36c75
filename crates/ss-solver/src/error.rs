//! Error types for solver operations.

use ss_core::error::SsError;
use thiserror::Error;

/// Errors that can occur while solving for a stationary distribution.
///
/// A solve reports `InvalidShape` or `DegenerateChain`. `Unresolved` marks a
/// broken internal invariant and `ThreadPool` an environment failure; neither
/// is part of the solve contract.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Invalid matrix shape: {what}")]
    InvalidShape { what: String },

    #[error("Degenerate chain: complement for state {state} is zero (absorbing or non-ergodic)")]
    DegenerateChain { state: usize },

    /// Internal: an equation `i >= 1` did not reduce to a single reference term.
    #[error("Elimination left state {state} unresolved against the reference state")]
    Unresolved { state: usize },

    /// Environmental: the dedicated rayon pool could not be built.
    #[error("Thread pool error: {what}")]
    ThreadPool { what: String },
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for SsError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::InvalidShape { what: _ } => SsError::InvalidArg {
                what: "matrix shape",
            },
            SolverError::DegenerateChain { state: _ } => SsError::InvalidArg {
                what: "degenerate chain",
            },
            SolverError::Unresolved { state: _ } => SsError::Invariant {
                what: "unresolved equation",
            },
            SolverError::ThreadPool { what: _ } => SsError::InvalidArg { what: "thread pool" },
        }
    }
}
