//! Solved stationary distribution.

use crate::matrix::TransitionMatrix;

/// Steady-state probability of one state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolvedValue {
    pub state: usize,
    pub probability: f64,
}

/// Full solution: one value per state, in state order.
#[derive(Clone, Debug, PartialEq)]
pub struct SteadySolution {
    pub values: Vec<SolvedValue>,
    /// Number of elimination rounds performed
    pub rounds: usize,
}

impl SteadySolution {
    pub(crate) fn from_probabilities(probabilities: Vec<f64>) -> Self {
        let rounds = probabilities.len().saturating_sub(1);
        let values = probabilities
            .into_iter()
            .enumerate()
            .map(|(state, probability)| SolvedValue { state, probability })
            .collect();
        Self { values, rounds }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, state: usize) -> Option<f64> {
        self.values.get(state).map(|v| v.probability)
    }

    pub fn probabilities(&self) -> Vec<f64> {
        self.values.iter().map(|v| v.probability).collect()
    }

    /// Σ π_i; 1 up to rounding for a well-formed chain.
    pub fn total(&self) -> f64 {
        self.values.iter().map(|v| v.probability).sum()
    }

    /// Max-norm of `P·π − π`.
    pub fn residual(&self, matrix: &TransitionMatrix) -> f64 {
        let pi = self.probabilities();
        matrix
            .apply(&pi)
            .iter()
            .zip(&pi)
            .map(|(lhs, rhs)| (lhs - rhs).abs())
            .fold(0.0, f64::max)
    }
}
