//! High-level solver interface.

use crate::chain::MarkovChain;
use crate::config::EliminationConfig;
use crate::error::SolverResult;
use crate::matrix::TransitionMatrix;
use crate::solution::SteadySolution;

/// Entry point turning a transition matrix into its stationary distribution.
#[derive(Clone, Debug, Default)]
pub struct SteadyStateSolver {
    config: EliminationConfig,
}

impl SteadyStateSolver {
    pub fn new(config: EliminationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EliminationConfig {
        &self.config
    }

    /// Solve for `π` with `π = P·π` and `Σ π_i = 1`.
    ///
    /// Returns exactly one value per state, or an error; never a partial
    /// vector.
    pub fn solve(&self, matrix: &TransitionMatrix) -> SolverResult<SteadySolution> {
        MarkovChain::new(matrix).solve(&self.config)
    }

    /// Like [`solve`](Self::solve) but starting from raw rows, checking the
    /// shape first.
    pub fn solve_rows(&self, rows: &[Vec<f64>]) -> SolverResult<SteadySolution> {
        let matrix = TransitionMatrix::from_rows(rows)?;
        self.solve(&matrix)
    }
}

/// Solve with the default configuration.
pub fn solve(matrix: &TransitionMatrix) -> SolverResult<SteadySolution> {
    SteadyStateSolver::default().solve(matrix)
}

/// Solve raw rows with the default configuration.
pub fn solve_rows(rows: &[Vec<f64>]) -> SolverResult<SteadySolution> {
    SteadyStateSolver::default().solve_rows(rows)
}
