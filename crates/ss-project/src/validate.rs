//! Chain file validation logic.

use crate::schema::ChainFile;
use ss_core::{Tolerances, nearly_equal};
use std::collections::HashSet;

pub const LATEST_VERSION: u32 = 1;

/// Column sums may deviate from 1 by this much.
const STOCHASTIC_TOL: Tolerances = Tolerances::absolute(1e-6);

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },

    #[error("Chain defines neither `matrix` nor `transitions`")]
    MissingMatrix,

    #[error("Chain defines both `matrix` and `transitions`")]
    AmbiguousMatrix,

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("State {index} out of range in {context} (chain has {count} states)")]
    StateOutOfRange {
        index: usize,
        count: usize,
        context: String,
    },

    #[error("Expected {states} state labels, found {labels}")]
    LabelCount { labels: usize, states: usize },

    #[error("Duplicate state label: {label}")]
    DuplicateLabel { label: String },

    #[error("Column {column} sums to {sum}, expected 1")]
    NotStochastic { column: usize, sum: f64 },
}

pub fn validate_chain_file(chain: &ChainFile) -> Result<(), ValidationError> {
    if chain.version == 0 || chain.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: chain.version,
        });
    }

    let count = match (&chain.matrix, chain.transitions.is_empty()) {
        (Some(_), false) => return Err(ValidationError::AmbiguousMatrix),
        (None, true) => return Err(ValidationError::MissingMatrix),
        (Some(rows), true) => validate_dense(rows)?,
        (None, false) => validate_sparse(chain)?,
    };

    if let Some(size) = chain.size {
        if size != count {
            return Err(ValidationError::InvalidValue {
                field: "size".to_string(),
                value: size.to_string(),
                reason: format!("matrix has {} states", count),
            });
        }
    }

    if !chain.states.is_empty() {
        if chain.states.len() != count {
            return Err(ValidationError::LabelCount {
                labels: chain.states.len(),
                states: count,
            });
        }
        let mut seen = HashSet::new();
        for label in &chain.states {
            if !seen.insert(label) {
                return Err(ValidationError::DuplicateLabel {
                    label: label.clone(),
                });
            }
        }
    }

    if chain.solver.threads == Some(0) {
        return Err(ValidationError::InvalidValue {
            field: "solver.threads".to_string(),
            value: "0".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    check_columns(&chain.dense_rows(count))
}

fn validate_dense(rows: &[Vec<f64>]) -> Result<usize, ValidationError> {
    let n = rows.len();
    if n == 0 {
        return Err(ValidationError::InvalidValue {
            field: "matrix".to_string(),
            value: "[]".to_string(),
            reason: "must have at least one state".to_string(),
        });
    }
    for (i, row) in rows.iter().enumerate() {
        if row.len() != n {
            return Err(ValidationError::InvalidValue {
                field: format!("matrix[{}]", i),
                value: format!("{} columns", row.len()),
                reason: format!("expected {} columns", n),
            });
        }
        for (j, &value) in row.iter().enumerate() {
            check_probability(&format!("matrix[{}][{}]", i, j), value)?;
        }
    }
    Ok(n)
}

fn validate_sparse(chain: &ChainFile) -> Result<usize, ValidationError> {
    let count = chain.size.unwrap_or(chain.states.len());
    if count == 0 {
        return Err(ValidationError::InvalidValue {
            field: "size".to_string(),
            value: "0".to_string(),
            reason: "sparse chains need `size` or `states`".to_string(),
        });
    }
    for (k, t) in chain.transitions.iter().enumerate() {
        for index in [t.from, t.to] {
            if index >= count {
                return Err(ValidationError::StateOutOfRange {
                    index,
                    count,
                    context: format!("transitions[{}]", k),
                });
            }
        }
        check_probability(&format!("transitions[{}].probability", k), t.probability)?;
    }
    Ok(count)
}

fn check_probability(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be finite and non-negative".to_string(),
        });
    }
    Ok(())
}

fn check_columns(rows: &[Vec<f64>]) -> Result<(), ValidationError> {
    for column in 0..rows.len() {
        let sum: f64 = rows.iter().map(|row| row[column]).sum();
        if !nearly_equal(sum, 1.0, STOCHASTIC_TOL) {
            return Err(ValidationError::NotStochastic { column, sum });
        }
    }
    Ok(())
}
