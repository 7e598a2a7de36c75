//! Markov chain owning the balance equations for one solve.

use crate::config::EliminationConfig;
use crate::engine::EliminationEngine;
use crate::equation::BalanceEquation;
use crate::error::SolverResult;
use crate::matrix::TransitionMatrix;
use crate::solution::SteadySolution;
use std::fmt;

/// A chain ready to be solved: the read-only matrix plus one balance
/// equation per row.
///
/// [`solve`](Self::solve) consumes the chain, so the equations are mutated by
/// exactly one solve and a failed solve leaves nothing behind.
#[derive(Clone, Debug)]
pub struct MarkovChain<'m> {
    matrix: &'m TransitionMatrix,
    equations: Vec<BalanceEquation>,
}

impl<'m> MarkovChain<'m> {
    pub fn new(matrix: &'m TransitionMatrix) -> Self {
        let equations = (0..matrix.len())
            .map(|i| BalanceEquation::from_row(i, &matrix.row(i)))
            .collect();
        Self { matrix, equations }
    }

    pub fn matrix(&self) -> &TransitionMatrix {
        self.matrix
    }

    pub fn equations(&self) -> &[BalanceEquation] {
        &self.equations
    }

    pub fn solve(mut self, config: &EliminationConfig) -> SolverResult<SteadySolution> {
        let probabilities = EliminationEngine::new(config).run(&mut self.equations)?;
        Ok(SteadySolution::from_probabilities(probabilities))
    }
}

impl fmt::Display for MarkovChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.matrix)
    }
}
