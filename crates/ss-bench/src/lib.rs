//! Benchmark framework for the steady-state solver.

pub mod export;
pub mod generator;

pub use export::{distribution_csv, timing_csv, write_csv};
pub use generator::{DEFAULT_FLOOR, random_column_stochastic};

use serde::{Deserialize, Serialize};
use ss_core::max_abs_diff;
use ss_solver::{
    EliminationConfig, SolverError, SteadySolution, SteadyStateSolver, TransitionMatrix,
};
use std::time::Instant;
use tracing::{debug, info};

/// Two pool sizes must agree on every probability to within this.
pub const SWEEP_AGREEMENT_TOL: f64 = 1e-9;

pub type BenchResult<T> = Result<T, BenchError>;

#[derive(thiserror::Error, Debug)]
pub enum BenchError {
    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("{threads} threads disagree with {baseline} threads by {diff:e}")]
    Disagreement {
        threads: usize,
        baseline: usize,
        diff: f64,
    },
}

/// A benchmark scenario definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkScenario {
    /// Unique identifier for this benchmark.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Number of states in the generated chain.
    pub size: usize,
    /// Generator seed.
    pub seed: u64,
    pub mode: BenchmarkMode,
}

/// Elimination schedule for benchmarks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum BenchmarkMode {
    Sequential,
    Parallel { threads: usize },
}

impl BenchmarkMode {
    pub fn to_config(&self) -> EliminationConfig {
        match self {
            BenchmarkMode::Sequential => EliminationConfig::sequential(),
            BenchmarkMode::Parallel { threads } => EliminationConfig::with_threads(*threads),
        }
    }

    pub fn threads(&self) -> Option<usize> {
        match self {
            BenchmarkMode::Sequential => None,
            BenchmarkMode::Parallel { threads } => Some(*threads),
        }
    }
}

/// A single run's measurements.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunMetrics {
    pub time_s: f64,
    pub rounds: usize,
    pub residual: f64,
    pub total: f64,
}

/// Aggregated statistics for multiple runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AggregateMetrics {
    pub run_count: usize,
    pub time_median_s: f64,
    pub time_min_s: f64,
    pub time_max_s: f64,
    pub residual_max: f64,
}

/// Complete benchmark result for a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub scenario: BenchmarkScenario,
    pub runs: Vec<RunMetrics>,
    pub aggregate: AggregateMetrics,
}

/// Collection of benchmark results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkSuite {
    pub timestamp: String,
    pub results: Vec<BenchmarkResult>,
}

impl BenchmarkSuite {
    pub fn new(results: Vec<BenchmarkResult>) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            results,
        }
    }
}

/// Run a single benchmark scenario `times` times on one generated matrix.
pub fn run_scenario(scenario: &BenchmarkScenario, times: usize) -> BenchResult<BenchmarkResult> {
    let matrix = random_column_stochastic(scenario.size, DEFAULT_FLOOR, scenario.seed)?;
    let solver = SteadyStateSolver::new(scenario.mode.to_config());

    let mut runs = Vec::with_capacity(times);
    for run in 0..times {
        let start = Instant::now();
        let solution = solver.solve(&matrix)?;
        let time_s = start.elapsed().as_secs_f64();
        debug!(scenario = %scenario.id, run, time_s, "benchmark run");
        runs.push(metrics_for(&solution, &matrix, time_s));
    }

    let aggregate = compute_aggregates(&runs);
    Ok(BenchmarkResult {
        scenario: scenario.clone(),
        runs,
        aggregate,
    })
}

fn metrics_for(
    solution: &SteadySolution,
    matrix: &TransitionMatrix,
    time_s: f64,
) -> RunMetrics {
    RunMetrics {
        time_s,
        rounds: solution.rounds,
        residual: solution.residual(matrix),
        total: solution.total(),
    }
}

pub fn compute_aggregates(runs: &[RunMetrics]) -> AggregateMetrics {
    if runs.is_empty() {
        return AggregateMetrics::default();
    }

    let mut times: Vec<_> = runs.iter().map(|r| r.time_s).collect();
    times.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    AggregateMetrics {
        run_count: runs.len(),
        time_median_s: times[times.len() / 2],
        time_min_s: times[0],
        time_max_s: times[times.len() - 1],
        residual_max: runs.iter().map(|r| r.residual).fold(0.0, f64::max),
    }
}

/// Default set of benchmark scenarios.
pub fn default_benchmarks() -> Vec<BenchmarkScenario> {
    let mut scenarios = Vec::new();
    for size in [10, 100, 250] {
        scenarios.push(BenchmarkScenario {
            id: format!("n{}_seq", size),
            name: format!("{} states, sequential", size),
            size,
            seed: 2024,
            mode: BenchmarkMode::Sequential,
        });
        scenarios.push(BenchmarkScenario {
            id: format!("n{}_par4", size),
            name: format!("{} states, 4 threads", size),
            size,
            seed: 2024,
            mode: BenchmarkMode::Parallel { threads: 4 },
        });
    }
    scenarios
}

/// Solve one generated chain with each pool size in `threads`.
///
/// Every size must reproduce the first size's distribution within
/// [`SWEEP_AGREEMENT_TOL`]; otherwise the sweep fails with
/// [`BenchError::Disagreement`]. An empty `threads` list is an
/// [`BenchError::InvalidArg`].
pub fn thread_sweep(
    size: usize,
    seed: u64,
    threads: &[usize],
    runs: usize,
) -> BenchResult<Vec<BenchmarkResult>> {
    if threads.is_empty() {
        return Err(BenchError::InvalidArg {
            what: "thread sweep needs at least one pool size".to_string(),
        });
    }
    let matrix = random_column_stochastic(size, DEFAULT_FLOOR, seed)?;
    let mut baseline: Option<(usize, Vec<f64>)> = None;
    let mut results = Vec::with_capacity(threads.len());

    for &count in threads {
        let scenario = BenchmarkScenario {
            id: format!("n{}_t{}", size, count),
            name: format!("{} states, {} threads", size, count),
            size,
            seed,
            mode: BenchmarkMode::Parallel { threads: count },
        };
        let solver = SteadyStateSolver::new(scenario.mode.to_config());

        let mut metrics = Vec::with_capacity(runs);
        let mut last = None;
        for _ in 0..runs.max(1) {
            let start = Instant::now();
            let solution = solver.solve(&matrix)?;
            metrics.push(metrics_for(&solution, &matrix, start.elapsed().as_secs_f64()));
            last = Some(solution.probabilities());
        }
        let probabilities = last.unwrap_or_default();

        match &baseline {
            Some((base_threads, base)) => {
                let diff = max_abs_diff(base, &probabilities).unwrap_or(f64::INFINITY);
                if diff > SWEEP_AGREEMENT_TOL {
                    return Err(BenchError::Disagreement {
                        threads: count,
                        baseline: *base_threads,
                        diff,
                    });
                }
            }
            None => baseline = Some((count, probabilities)),
        }

        let aggregate = compute_aggregates(&metrics);
        info!(threads = count, median_s = aggregate.time_median_s, "sweep point");
        results.push(BenchmarkResult {
            scenario,
            runs: metrics,
            aggregate,
        });
    }
    Ok(results)
}
