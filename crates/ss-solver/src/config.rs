//! Elimination engine configuration.

/// How the substitution tasks of one elimination round are executed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Schedule {
    /// Every round runs on the calling thread.
    Sequential,
    /// Rounds fan out over a rayon pool, one task per target equation.
    #[default]
    Parallel,
}

/// Elimination engine configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct EliminationConfig {
    /// Execution schedule for rounds
    pub schedule: Schedule,
    /// Size of a dedicated worker pool; `None` uses the global rayon pool
    pub threads: Option<usize>,
    /// Chains with fewer states than this run sequentially
    pub parallel_threshold: usize,
}

impl Default for EliminationConfig {
    fn default() -> Self {
        Self {
            schedule: Schedule::Parallel,
            threads: None,
            parallel_threshold: 32,
        }
    }
}

impl EliminationConfig {
    pub fn sequential() -> Self {
        Self {
            schedule: Schedule::Sequential,
            ..Self::default()
        }
    }

    /// Parallel schedule on a dedicated pool of `threads` workers, with no
    /// size threshold.
    pub fn with_threads(threads: usize) -> Self {
        Self {
            schedule: Schedule::Parallel,
            threads: Some(threads),
            parallel_threshold: 0,
        }
    }

    /// Whether a chain of `states` states should use the parallel path.
    pub fn runs_parallel(&self, states: usize) -> bool {
        self.schedule == Schedule::Parallel && states >= self.parallel_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_gates_parallelism() {
        let config = EliminationConfig::default();
        assert!(!config.runs_parallel(3));
        assert!(config.runs_parallel(100));
        assert!(!EliminationConfig::sequential().runs_parallel(1000));
        assert!(EliminationConfig::with_threads(2).runs_parallel(2));
    }
}
