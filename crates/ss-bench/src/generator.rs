//! Seeded random chain supplier.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::{BenchError, BenchResult};
use ss_solver::TransitionMatrix;

/// Lower bound used when no floor is specified.
pub const DEFAULT_FLOOR: f64 = 0.05;

/// Random `n × n` column-stochastic matrix.
///
/// Entries are drawn uniformly from `[floor, 1)` and each column is then
/// scaled to sum to 1, so with `floor > 0` every entry is positive and the
/// chain is ergodic. The same `(n, floor, seed)` always yields the same matrix.
/// `floor` must be finite and in `[0, 1)`.
pub fn random_column_stochastic(n: usize, floor: f64, seed: u64) -> BenchResult<TransitionMatrix> {
    if !(0.0..1.0).contains(&floor) {
        return Err(BenchError::InvalidArg {
            what: format!("floor must lie in [0, 1), got {}", floor),
        });
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows: Vec<Vec<f64>> = (0..n)
        .map(|_| (0..n).map(|_| rng.random_range(floor..1.0)).collect())
        .collect();

    for j in 0..n {
        let sum: f64 = rows.iter().map(|row| row[j]).sum();
        if sum > 0.0 {
            for row in rows.iter_mut() {
                row[j] /= sum;
            }
        }
    }
    Ok(TransitionMatrix::from_rows(&rows)?)
}
