//! Conversion between chain files and solver inputs.

use crate::schema::{ChainFile, ScheduleDef, SolverDef};
use crate::validate::{LATEST_VERSION, validate_chain_file};
use crate::ProjectResult;
use ss_solver::{EliminationConfig, Schedule, TransitionMatrix};

impl ChainFile {
    /// Wrap a matrix as a dense chain file with default solver settings.
    pub fn from_matrix(name: impl Into<String>, matrix: &TransitionMatrix) -> Self {
        Self {
            version: LATEST_VERSION,
            name: name.into(),
            states: vec![],
            size: None,
            matrix: Some(matrix.rows()),
            transitions: vec![],
            solver: SolverDef::default(),
        }
    }

    /// Number of states. Assumes the file has been validated.
    pub fn state_count(&self) -> usize {
        match &self.matrix {
            Some(rows) => rows.len(),
            None => self.size.unwrap_or(self.states.len()),
        }
    }

    /// Label for `state`, falling back to `s<index>`.
    pub fn label(&self, state: usize) -> String {
        self.states
            .get(state)
            .cloned()
            .unwrap_or_else(|| format!("s{}", state))
    }

    pub fn labels(&self) -> Vec<String> {
        (0..self.state_count()).map(|i| self.label(i)).collect()
    }

    /// Dense rows of size `count`; sparse transitions `from -> to` land in
    /// entry `(to, from)` and repeated pairs are summed.
    pub(crate) fn dense_rows(&self, count: usize) -> Vec<Vec<f64>> {
        if let Some(rows) = &self.matrix {
            return rows.clone();
        }
        let mut rows = vec![vec![0.0; count]; count];
        for t in &self.transitions {
            rows[t.to][t.from] += t.probability;
        }
        rows
    }

    /// Validate and build the solver matrix.
    pub fn to_matrix(&self) -> ProjectResult<TransitionMatrix> {
        validate_chain_file(self)?;
        let rows = self.dense_rows(self.state_count());
        Ok(TransitionMatrix::from_rows(&rows)?)
    }
}

impl SolverDef {
    pub fn to_config(&self) -> EliminationConfig {
        EliminationConfig {
            schedule: match self.schedule {
                ScheduleDef::Sequential => Schedule::Sequential,
                ScheduleDef::Parallel => Schedule::Parallel,
            },
            threads: self.threads,
            parallel_threshold: self.parallel_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TransitionDef;

    #[test]
    fn sparse_transitions_fill_columns() {
        let chain = ChainFile {
            version: 1,
            name: "flip".to_string(),
            states: vec!["heads".to_string(), "tails".to_string()],
            size: None,
            matrix: None,
            transitions: vec![
                TransitionDef { from: 0, to: 1, probability: 0.25 },
                TransitionDef { from: 0, to: 1, probability: 0.25 },
                TransitionDef { from: 0, to: 0, probability: 0.5 },
                TransitionDef { from: 1, to: 0, probability: 1.0 },
            ],
            solver: SolverDef::default(),
        };

        let matrix = chain.to_matrix().unwrap();
        assert_eq!(matrix.row(0), vec![0.5, 1.0]);
        assert_eq!(matrix.row(1), vec![0.5, 0.0]);
        assert_eq!(chain.labels(), vec!["heads", "tails"]);
    }

    #[test]
    fn default_labels_are_indexed() {
        let matrix = TransitionMatrix::from_rows(&[vec![1.0]]).unwrap();
        let chain = ChainFile::from_matrix("one", &matrix);
        assert_eq!(chain.labels(), vec!["s0"]);
        assert_eq!(chain.to_matrix().unwrap(), matrix);
    }

    #[test]
    fn solver_section_maps_to_config() {
        let def = SolverDef {
            schedule: ScheduleDef::Sequential,
            threads: Some(3),
            parallel_threshold: 5,
        };
        let config = def.to_config();
        assert_eq!(config.schedule, Schedule::Sequential);
        assert_eq!(config.threads, Some(3));
        assert_eq!(config.parallel_threshold, 5);
    }
}
