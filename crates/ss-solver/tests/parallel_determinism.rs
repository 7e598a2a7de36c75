//! Results must not depend on the schedule or the worker count.

mod common;

use common::random_chain;
use ss_core::max_abs_diff;
use ss_solver::{EliminationConfig, SteadyStateSolver};

#[test]
fn pool_size_does_not_change_the_result() {
    let matrix = random_chain(100, 2024);
    let baseline = SteadyStateSolver::new(EliminationConfig::sequential())
        .solve(&matrix)
        .unwrap()
        .probabilities();

    for threads in [1, 2, 4, 8] {
        let pi = SteadyStateSolver::new(EliminationConfig::with_threads(threads))
            .solve(&matrix)
            .unwrap()
            .probabilities();
        let diff = max_abs_diff(&baseline, &pi).unwrap();
        assert!(diff <= 1e-9, "threads={threads}: diff {diff}");
    }
}

#[test]
fn repeated_solves_agree() {
    let matrix = random_chain(64, 11);
    let solver = SteadyStateSolver::default();
    let first = solver.solve(&matrix).unwrap();
    for _ in 0..5 {
        let again = solver.solve(&matrix).unwrap();
        let diff = max_abs_diff(&first.probabilities(), &again.probabilities()).unwrap();
        assert!(diff <= 1e-9);
    }
}
