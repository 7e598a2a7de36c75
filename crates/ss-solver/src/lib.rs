//! Steady-state solver for finite discrete-time Markov chains.
//!
//! The balance equations `π_i = Σ_j P[i][j]·π_j` (one per state) are reduced by
//! symbolic variable elimination until every state `i ≥ 1` is a multiple of the
//! reference state 0; normalization then fixes `π_0` and back-substitution the
//! rest. Each elimination round substitutes one equation into all others and is
//! fanned out over a rayon pool.

pub mod chain;
pub mod config;
pub mod engine;
pub mod equation;
pub mod error;
pub mod matrix;
pub mod solution;
pub mod solve;
pub mod term;

pub use chain::MarkovChain;
pub use config::{EliminationConfig, Schedule};
pub use engine::EliminationEngine;
pub use equation::BalanceEquation;
pub use error::{SolverError, SolverResult};
pub use matrix::TransitionMatrix;
pub use solution::{SolvedValue, SteadySolution};
pub use solve::{SteadyStateSolver, solve, solve_rows};
pub use term::Term;

/// Index of the reference state every other state is expressed against.
pub const REFERENCE_STATE: usize = 0;
