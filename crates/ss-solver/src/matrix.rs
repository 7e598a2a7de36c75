//! Square transition-coefficient matrix.

use crate::error::{SolverError, SolverResult};
use nalgebra::{DMatrix, DVector};
use ss_core::{SsError, Tolerances, ensure_finite, nearly_equal};
use std::fmt;

/// `N × N` coefficient matrix, row `i` holding the balance equation of state `i`.
///
/// Entry `(i, j)` is the probability of moving from state `j` into state `i`,
/// so for a valid chain every column sums to 1.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionMatrix {
    inner: DMatrix<f64>,
}

impl TransitionMatrix {
    /// Build from row vectors. The rows must form a non-empty square matrix.
    pub fn from_rows(rows: &[Vec<f64>]) -> SolverResult<Self> {
        let n = rows.len();
        if n == 0 {
            return Err(SolverError::InvalidShape {
                what: "matrix has no rows".to_string(),
            });
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != n) {
            return Err(SolverError::InvalidShape {
                what: format!("row {} has {} columns, expected {}", i, row.len(), n),
            });
        }

        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        Ok(Self {
            inner: DMatrix::from_row_slice(n, n, &flat),
        })
    }

    /// Wrap an existing nalgebra matrix.
    pub fn from_dmatrix(inner: DMatrix<f64>) -> SolverResult<Self> {
        let (rows, cols) = inner.shape();
        if rows == 0 || rows != cols {
            return Err(SolverError::InvalidShape {
                what: format!("matrix is {}x{}, expected square and non-empty", rows, cols),
            });
        }
        Ok(Self { inner })
    }

    /// Number of states.
    pub fn len(&self) -> usize {
        self.inner.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn entry(&self, i: usize, j: usize) -> f64 {
        self.inner[(i, j)]
    }

    pub fn row(&self, i: usize) -> Vec<f64> {
        self.inner.row(i).iter().copied().collect()
    }

    pub fn rows(&self) -> Vec<Vec<f64>> {
        (0..self.len()).map(|i| self.row(i)).collect()
    }

    pub fn column_sums(&self) -> Vec<f64> {
        self.inner.row_sum().iter().copied().collect()
    }

    pub fn as_dmatrix(&self) -> &DMatrix<f64> {
        &self.inner
    }

    /// `P · x`.
    pub fn apply(&self, x: &[f64]) -> Vec<f64> {
        let v = DVector::from_column_slice(x);
        (&self.inner * v).iter().copied().collect()
    }

    /// Check that entries are finite and non-negative and every column sums to 1.
    ///
    /// The solver itself never calls this; it is for callers that want to
    /// reject malformed chains up front.
    pub fn validate_stochastic(&self, tol: Tolerances) -> Result<(), SsError> {
        for value in self.inner.iter() {
            ensure_finite(*value, "matrix entry")?;
            if *value < 0.0 {
                return Err(SsError::InvalidArg {
                    what: "negative transition coefficient",
                });
            }
        }
        if self
            .column_sums()
            .iter()
            .any(|&sum| !nearly_equal(sum, 1.0, tol))
        {
            return Err(SsError::InvalidArg {
                what: "column does not sum to 1",
            });
        }
        Ok(())
    }
}

impl fmt::Display for TransitionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.len() {
            let row: Vec<String> = self.inner.row(i).iter().map(|v| v.to_string()).collect();
            writeln!(f, "{}", row.join("  "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TransitionMatrix {
        TransitionMatrix::from_rows(&[
            vec![0.65, 0.15, 0.1],
            vec![0.25, 0.65, 0.4],
            vec![0.1, 0.2, 0.5],
        ])
        .unwrap()
    }

    #[test]
    fn from_rows_is_row_major() {
        let m = sample();
        assert_eq!(m.len(), 3);
        assert_eq!(m.entry(0, 1), 0.15);
        assert_eq!(m.entry(1, 2), 0.4);
        assert_eq!(m.row(2), vec![0.1, 0.2, 0.5]);
    }

    #[test]
    fn rejects_empty_and_non_square() {
        assert!(matches!(
            TransitionMatrix::from_rows(&[]),
            Err(SolverError::InvalidShape { .. })
        ));
        assert!(matches!(
            TransitionMatrix::from_rows(&[vec![0.5, 0.5], vec![0.5, 0.5], vec![0.0, 0.0]]),
            Err(SolverError::InvalidShape { .. })
        ));
        assert!(matches!(
            TransitionMatrix::from_rows(&[vec![1.0], vec![0.0, 1.0]]),
            Err(SolverError::InvalidShape { .. })
        ));
        assert!(matches!(
            TransitionMatrix::from_dmatrix(DMatrix::zeros(2, 3)),
            Err(SolverError::InvalidShape { .. })
        ));
    }

    #[test]
    fn column_sums_and_validation() {
        let m = sample();
        for sum in m.column_sums() {
            assert!((sum - 1.0).abs() < 1e-12);
        }
        m.validate_stochastic(Tolerances::default()).unwrap();

        let bad = TransitionMatrix::from_rows(&[vec![0.5, 0.5], vec![0.2, 0.5]]).unwrap();
        assert!(bad.validate_stochastic(Tolerances::default()).is_err());

        let negative = TransitionMatrix::from_rows(&[vec![1.5, 0.5], vec![-0.5, 0.5]]).unwrap();
        assert!(negative.validate_stochastic(Tolerances::default()).is_err());
    }

    #[test]
    fn apply_multiplies() {
        let m = TransitionMatrix::from_rows(&[vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        assert_eq!(m.apply(&[0.25, 0.75]), vec![0.75, 0.25]);
    }

    #[test]
    fn display_prints_rows() {
        let m = TransitionMatrix::from_rows(&[vec![0.5, 0.25], vec![0.5, 0.75]]).unwrap();
        assert_eq!(m.to_string(), "0.5  0.25\n0.5  0.75\n");
    }
}
