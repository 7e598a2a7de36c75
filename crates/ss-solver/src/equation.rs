//! Balance equation `π_defined = Σ_j c_j · π_j` and its reductions.

use crate::error::{SolverError, SolverResult};
use crate::term::Term;
use std::collections::HashMap;
use std::fmt;

/// One linear balance equation, keyed by the state it defines.
///
/// Terms are kept in insertion order; `slots` maps a state index to the
/// position of its term so lookups and merges are O(1) expected.
///
/// Postconditions of every public mutator: at most one term per state, and
/// after [`simplify`](Self::simplify) or [`substitute`](Self::substitute) no
/// term references the defined state itself.
#[derive(Clone, Debug, PartialEq)]
pub struct BalanceEquation {
    defined: usize,
    terms: Vec<Term>,
    slots: HashMap<usize, usize>,
}

impl BalanceEquation {
    /// Equation for state `defined` from one matrix row: one term per column,
    /// zero coefficients and the self-term included.
    pub fn from_row(defined: usize, row: &[f64]) -> Self {
        let terms: Vec<Term> = row
            .iter()
            .enumerate()
            .map(|(state, &c)| Term::new(state, c))
            .collect();
        let slots = (0..terms.len()).map(|pos| (pos, pos)).collect();
        Self {
            defined,
            terms,
            slots,
        }
    }

    /// Equation from an arbitrary term list. Repeated states are summed.
    pub fn from_terms(defined: usize, terms: Vec<Term>) -> Self {
        let mut equation = Self {
            defined,
            terms,
            slots: HashMap::new(),
        };
        equation.consolidate();
        equation
    }

    pub fn defined_index(&self) -> usize {
        self.defined
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn coefficient(&self, state: usize) -> Option<f64> {
        self.slots.get(&state).map(|&pos| self.terms[pos].coefficient)
    }

    pub fn references(&self, state: usize) -> bool {
        self.slots.contains_key(&state)
    }

    /// `k` such that `π_defined = k · π_reference`, once the equation has been
    /// reduced to that single term.
    pub fn resolved_multiple(&self, reference: usize) -> Option<f64> {
        match self.terms.as_slice() {
            [only] if only.state() == reference => Some(only.coefficient),
            _ => None,
        }
    }

    /// Remove the self-term `s` and divide the rest by `1 - s`.
    ///
    /// Fails with [`SolverError::DegenerateChain`] when `s == 1`.
    pub fn simplify(&mut self) -> SolverResult<()> {
        match self.remove_term(self.defined) {
            Some(self_coefficient) => self.rescale(1.0 - self_coefficient),
            None => Ok(()),
        }
    }

    /// Replace the reference to `other.defined_index()` with `other`'s terms.
    ///
    /// A term pointing back at this equation's own state is folded into the
    /// complement instead of being stored, so the result is already simplified.
    /// Returns `false` (and leaves the equation untouched) if there was nothing
    /// to substitute.
    ///
    /// On error the equation is left partially reduced; callers discard it.
    pub fn substitute(&mut self, other: &BalanceEquation) -> SolverResult<bool> {
        let Some(multiplier) = self.remove_term(other.defined) else {
            return Ok(false);
        };

        let mut complement = 1.0;
        for term in &other.terms {
            let scaled = term.coefficient * multiplier;
            if let Some(&pos) = self.slots.get(&term.state()) {
                self.terms[pos].coefficient += scaled;
            } else if term.state() == self.defined {
                complement -= scaled;
            } else {
                self.push(Term::new(term.state(), scaled));
            }
        }

        self.rescale(complement)?;
        Ok(true)
    }

    /// Merge terms that share a state, summing their coefficients.
    ///
    /// Rebuilds the slot index from the term list and returns how many
    /// duplicates were folded away. Idempotent.
    pub fn consolidate(&mut self) -> usize {
        let raw = std::mem::take(&mut self.terms);
        self.slots.clear();
        self.terms.reserve(raw.len());

        let mut merged = 0;
        for term in raw {
            match self.slots.get(&term.state()) {
                Some(&pos) => {
                    self.terms[pos].coefficient += term.coefficient;
                    merged += 1;
                }
                None => self.push(term),
            }
        }
        merged
    }

    fn push(&mut self, term: Term) {
        self.slots.insert(term.state(), self.terms.len());
        self.terms.push(term);
    }

    fn remove_term(&mut self, state: usize) -> Option<f64> {
        let pos = self.slots.remove(&state)?;
        let removed = self.terms.swap_remove(pos);
        if let Some(moved) = self.terms.get(pos) {
            self.slots.insert(moved.state(), pos);
        }
        Some(removed.coefficient)
    }

    fn rescale(&mut self, complement: f64) -> SolverResult<()> {
        if complement == 0.0 {
            return Err(SolverError::DegenerateChain {
                state: self.defined,
            });
        }
        if complement != 1.0 {
            for term in &mut self.terms {
                term.coefficient /= complement;
            }
        }
        Ok(())
    }
}

impl fmt::Display for BalanceEquation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "π_{} =", self.defined)?;
        if self.terms.is_empty() {
            return write!(f, " 0");
        }
        let mut sorted: Vec<&Term> = self.terms.iter().collect();
        sorted.sort_by_key(|t| t.state());
        for (i, term) in sorted.into_iter().enumerate() {
            if i > 0 {
                write!(f, " +")?;
            }
            write!(f, " {term}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-12, "{a} != {b}");
    }

    #[test]
    fn from_row_keeps_every_column() {
        let eq = BalanceEquation::from_row(1, &[0.25, 0.0, 0.75]);
        assert_eq!(eq.len(), 3);
        assert_eq!(eq.coefficient(1), Some(0.0));
        assert_eq!(eq.coefficient(2), Some(0.75));
        assert!(eq.references(0));
    }

    #[test]
    fn simplify_removes_self_term_and_rescales() {
        let mut eq = BalanceEquation::from_row(0, &[0.5, 0.25, 0.25]);
        eq.simplify().unwrap();

        assert!(!eq.references(0));
        assert_close(eq.coefficient(1).unwrap(), 0.5);
        assert_close(eq.coefficient(2).unwrap(), 0.5);
    }

    #[test]
    fn simplify_without_self_term_is_noop() {
        let mut eq = BalanceEquation::from_terms(2, vec![Term::new(0, 0.3)]);
        let before = eq.clone();
        eq.simplify().unwrap();
        assert_eq!(eq, before);
    }

    #[test]
    fn simplify_detects_absorbing_state() {
        let mut eq = BalanceEquation::from_row(1, &[0.0, 1.0]);
        let err = eq.simplify().unwrap_err();
        assert_eq!(err, SolverError::DegenerateChain { state: 1 });
    }

    #[test]
    fn substitute_merges_existing_terms() {
        // π_2 = 0.5 π_0 + 0.5 π_1,  π_1 = 0.4 π_0 + 0.6 π_3
        let mut target =
            BalanceEquation::from_terms(2, vec![Term::new(0, 0.5), Term::new(1, 0.5)]);
        let pivot = BalanceEquation::from_terms(1, vec![Term::new(0, 0.4), Term::new(3, 0.6)]);

        assert!(target.substitute(&pivot).unwrap());

        assert!(!target.references(1));
        assert_close(target.coefficient(0).unwrap(), 0.7);
        assert_close(target.coefficient(3).unwrap(), 0.3);
        assert_eq!(target.len(), 2);
    }

    #[test]
    fn substitute_folds_renewed_self_loop_into_complement() {
        // π_2 = 0.5 π_0 + 0.5 π_1,  π_1 = 0.5 π_0 + 0.5 π_2
        // => π_2 = 0.75 π_0 + 0.25 π_2 => π_2 = π_0
        let mut target =
            BalanceEquation::from_terms(2, vec![Term::new(0, 0.5), Term::new(1, 0.5)]);
        let pivot = BalanceEquation::from_terms(1, vec![Term::new(0, 0.5), Term::new(2, 0.5)]);

        target.substitute(&pivot).unwrap();

        assert!(!target.references(2));
        assert_eq!(target.len(), 1);
        assert_close(target.resolved_multiple(0).unwrap(), 1.0);
    }

    #[test]
    fn substitute_without_reference_is_noop() {
        let mut target = BalanceEquation::from_terms(2, vec![Term::new(0, 1.0)]);
        let pivot = BalanceEquation::from_terms(1, vec![Term::new(0, 0.5), Term::new(2, 0.5)]);
        let before = target.clone();

        assert!(!target.substitute(&pivot).unwrap());
        assert_eq!(target, before);
    }

    #[test]
    fn substitute_detects_zero_complement() {
        // π_2 = π_1 and π_1 = π_2: a closed class cut off from state 0
        let mut target = BalanceEquation::from_terms(2, vec![Term::new(1, 1.0)]);
        let pivot = BalanceEquation::from_terms(1, vec![Term::new(2, 1.0)]);

        let err = target.substitute(&pivot).unwrap_err();
        assert_eq!(err, SolverError::DegenerateChain { state: 2 });
    }

    #[test]
    fn consolidate_merges_duplicates() {
        let mut eq = BalanceEquation::from_terms(
            0,
            vec![
                Term::new(1, 0.25),
                Term::new(2, 0.5),
                Term::new(1, 0.125),
                Term::new(1, 0.125),
            ],
        );
        assert_eq!(eq.len(), 2);
        assert_close(eq.coefficient(1).unwrap(), 0.5);
        assert_eq!(eq.consolidate(), 0);
        assert_eq!(eq.len(), 2);
    }

    #[test]
    fn resolved_multiple_requires_single_reference_term() {
        let eq = BalanceEquation::from_terms(3, vec![Term::new(0, 0.2)]);
        assert_eq!(eq.resolved_multiple(0), Some(0.2));

        let eq = BalanceEquation::from_terms(3, vec![Term::new(0, 0.2), Term::new(1, 0.1)]);
        assert_eq!(eq.resolved_multiple(0), None);

        let eq = BalanceEquation::from_terms(3, vec![Term::new(1, 0.2)]);
        assert_eq!(eq.resolved_multiple(0), None);
    }

    #[test]
    fn display_orders_terms_by_state() {
        let eq = BalanceEquation::from_terms(1, vec![Term::new(2, 0.5), Term::new(0, 0.25)]);
        assert_eq!(eq.to_string(), "π_1 = 0.25·π_0 + 0.5·π_2");
        let empty = BalanceEquation::from_terms(1, vec![]);
        assert_eq!(empty.to_string(), "π_1 = 0");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn raw_terms() -> impl Strategy<Value = Vec<Term>> {
        prop::collection::vec((0_usize..6, 0.0_f64..1.0), 0..16)
            .prop_map(|v| v.into_iter().map(|(s, c)| Term::new(s, c)).collect())
    }

    fn unique_states(eq: &BalanceEquation) -> bool {
        let mut seen = HashSet::new();
        eq.terms().iter().all(|t| seen.insert(t.state()))
    }

    proptest! {
        #[test]
        fn consolidate_preserves_mass_and_uniqueness(terms in raw_terms()) {
            let total: f64 = terms.iter().map(|t| t.coefficient()).sum();
            let mut eq = BalanceEquation::from_terms(7, terms);

            prop_assert!(unique_states(&eq));
            let merged: f64 = eq.terms().iter().map(|t| t.coefficient()).sum();
            prop_assert!((total - merged).abs() < 1e-9);

            let before = eq.clone();
            prop_assert_eq!(eq.consolidate(), 0);
            prop_assert_eq!(eq, before);
        }

        #[test]
        fn substitute_keeps_terms_unique_and_self_free(
            target in raw_terms(),
            pivot in raw_terms(),
        ) {
            // Scale so complements can never hit exactly zero.
            let shrink = |v: Vec<Term>| -> Vec<Term> {
                v.into_iter().map(|t| Term::new(t.state(), t.coefficient() * 0.1)).collect()
            };
            let mut target = BalanceEquation::from_terms(4, shrink(target));
            target.simplify().unwrap();
            let mut pivot = BalanceEquation::from_terms(2, shrink(pivot));
            pivot.simplify().unwrap();

            target.substitute(&pivot).unwrap();

            prop_assert!(unique_states(&target));
            prop_assert!(!target.references(4));
            prop_assert!(!target.references(2));
        }
    }
}
