use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ss_solver::TransitionMatrix;

/// Dense random chain: positive entries, every column normalized to 1.
pub fn random_chain(n: usize, seed: u64) -> TransitionMatrix {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows: Vec<Vec<f64>> = (0..n)
        .map(|_| (0..n).map(|_| rng.random_range(0.05..1.0)).collect())
        .collect();
    for j in 0..n {
        let sum: f64 = rows.iter().map(|row| row[j]).sum();
        for row in rows.iter_mut() {
            row[j] /= sum;
        }
    }
    TransitionMatrix::from_rows(&rows).unwrap()
}
