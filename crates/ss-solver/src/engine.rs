//! Elimination schedule: simplify, substitution rounds, normalization.

use crate::REFERENCE_STATE;
use crate::config::EliminationConfig;
use crate::equation::BalanceEquation;
use crate::error::{SolverError, SolverResult};
use rayon::prelude::*;
use ss_core::timing::{Timer, elimination_timing};
use tracing::{debug, trace, warn};

/// One elimination round.
///
/// Lends the pivot equation out read-only and every other non-reference
/// equation out mutably, each slot to exactly one task. The reference
/// equation is never a target: `π_0` comes from normalization.
struct Round<'a> {
    pivot: &'a BalanceEquation,
    before: &'a mut [BalanceEquation],
    after: &'a mut [BalanceEquation],
}

impl<'a> Round<'a> {
    /// `pivot` must lie in `1..equations.len()`.
    fn split(equations: &'a mut [BalanceEquation], pivot: usize) -> Self {
        let (head, rest) = equations.split_at_mut(pivot);
        let (pivot_slot, after) = rest.split_at_mut(1);
        let pivot_slot: &'a [BalanceEquation] = pivot_slot;
        Self {
            pivot: &pivot_slot[0],
            before: &mut head[REFERENCE_STATE + 1..],
            after,
        }
    }

    fn targets(&self) -> usize {
        self.before.len() + self.after.len()
    }

    fn run_sequential(self) -> SolverResult<()> {
        let pivot = self.pivot;
        self.before
            .iter_mut()
            .chain(self.after.iter_mut())
            .try_for_each(|eq| eq.substitute(pivot).map(|_| ()))
    }

    fn run_parallel(self) -> SolverResult<()> {
        let pivot = self.pivot;
        self.before
            .par_iter_mut()
            .chain(self.after.par_iter_mut())
            .try_for_each(|eq| eq.substitute(pivot).map(|_| ()))
    }
}

/// Drives the reduction of N balance equations to the stationary vector.
pub struct EliminationEngine<'c> {
    config: &'c EliminationConfig,
}

impl<'c> EliminationEngine<'c> {
    pub fn new(config: &'c EliminationConfig) -> Self {
        Self { config }
    }

    /// Reduce `equations` in place and return the stationary probabilities.
    ///
    /// Slot `i` must hold the equation defining state `i`. Rounds run in
    /// pivot order `1..N`; within a round every target is independent. Any
    /// error aborts the whole reduction and the equations must be discarded.
    pub fn run(&self, equations: &mut [BalanceEquation]) -> SolverResult<Vec<f64>> {
        let n = equations.len();
        match n {
            0 => {
                return Err(SolverError::InvalidShape {
                    what: "no equations to eliminate".to_string(),
                });
            }
            1 => return Ok(vec![1.0]),
            _ => {}
        }
        if let Some((slot, eq)) = equations
            .iter()
            .enumerate()
            .find(|(slot, eq)| eq.defined_index() != *slot)
        {
            return Err(SolverError::InvalidShape {
                what: format!(
                    "slot {} holds the equation for state {}",
                    slot,
                    eq.defined_index()
                ),
            });
        }

        let parallel = self.config.runs_parallel(n);
        debug!(states = n, parallel, threads = ?self.config.threads, "starting elimination");

        let reduced = if parallel {
            self.in_pool(|| reduce(equations, true))?
        } else {
            reduce(equations, false)
        };
        if let Err(SolverError::DegenerateChain { state }) = &reduced {
            warn!(state, "zero complement, aborting solve");
        }
        let multiples = reduced?;

        let timer = Timer::start();
        let probabilities = normalize(&multiples);
        timer.stop_into(&elimination_timing::NORMALIZE);

        debug!(states = n, pi_0 = probabilities[REFERENCE_STATE], "elimination complete");
        Ok(probabilities)
    }

    fn in_pool<R: Send>(&self, op: impl FnOnce() -> R + Send) -> SolverResult<R> {
        match self.config.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| SolverError::ThreadPool {
                        what: e.to_string(),
                    })?;
                Ok(pool.install(op))
            }
            None => Ok(op()),
        }
    }
}

/// Simplify every equation, run all rounds, and return `k_i` for `i >= 1`
/// such that `π_i = k_i · π_0`.
fn reduce(equations: &mut [BalanceEquation], parallel: bool) -> SolverResult<Vec<f64>> {
    let timer = Timer::start();
    if parallel {
        equations
            .par_iter_mut()
            .try_for_each(BalanceEquation::simplify)?;
    } else {
        equations.iter_mut().try_for_each(BalanceEquation::simplify)?;
    }
    timer.stop_into(&elimination_timing::SIMPLIFY);

    for pivot in REFERENCE_STATE + 1..equations.len() {
        let timer = Timer::start();
        let round = Round::split(equations, pivot);
        trace!(pivot, targets = round.targets(), "elimination round");
        if parallel {
            round.run_parallel()?;
        } else {
            round.run_sequential()?;
        }
        timer.stop_into(&elimination_timing::ROUND);
    }

    equations
        .iter()
        .skip(REFERENCE_STATE + 1)
        .map(|eq| {
            eq.resolved_multiple(REFERENCE_STATE)
                .ok_or(SolverError::Unresolved {
                    state: eq.defined_index(),
                })
        })
        .collect()
}

/// `π_0 = 1 / (1 + Σ k_i)`, then `π_i = k_i · π_0`.
///
/// The sum runs in index order so results do not depend on the schedule.
fn normalize(multiples: &[f64]) -> Vec<f64> {
    let pi_0 = 1.0 / (1.0 + multiples.iter().sum::<f64>());
    std::iter::once(pi_0)
        .chain(multiples.iter().map(|k| k * pi_0))
        .collect()
}
