//! Atomic unit of a linear balance expression.

use std::fmt;

/// A `(state, coefficient)` pair: `coefficient · π_state`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Term {
    state: usize,
    pub(crate) coefficient: f64,
}

impl Term {
    pub fn new(state: usize, coefficient: f64) -> Self {
        Self { state, coefficient }
    }

    /// State index this term refers to. Fixed for the life of the term.
    pub fn state(&self) -> usize {
        self.state
    }

    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}·π_{}", self.coefficient, self.state)
    }
}
