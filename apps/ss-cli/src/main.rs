mod logging;

use clap::{Parser, Subcommand};
use ss_bench::{
    BenchError, DEFAULT_FLOOR, distribution_csv, random_column_stochastic, thread_sweep,
    timing_csv, write_csv,
};
use ss_core::timing::{self, elimination_timing};
use ss_project::{ChainFile, ProjectError};
use ss_solver::{EliminationConfig, Schedule, SolverError, SteadyStateSolver};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

type CliResult<T> = Result<T, CliError>;

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Project(#[from] ProjectError),
    #[error(transparent)]
    Solver(#[from] SolverError),
    #[error(transparent)]
    Bench(#[from] BenchError),
}

#[derive(Parser)]
#[command(name = "ss-cli")]
#[command(about = "Steady-state distributions of finite Markov chains", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print elimination phase timings
    #[arg(long, global = true)]
    timing: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a chain file for its stationary distribution
    Solve {
        /// Path to the chain YAML/JSON file
        chain_path: PathBuf,
        /// Dedicated worker pool size (overrides the file)
        #[arg(long)]
        threads: Option<usize>,
        /// Run every round on the calling thread
        #[arg(long, conflicts_with = "threads")]
        sequential: bool,
        /// Write `state,label,probability` rows to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Validate chain file syntax and structure
    Validate {
        /// Path to the chain YAML/JSON file
        chain_path: PathBuf,
    },
    /// Write a random column-stochastic chain file
    Generate {
        /// Number of states
        #[arg(long)]
        size: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Smallest raw entry before column normalization
        #[arg(long, default_value_t = DEFAULT_FLOOR)]
        floor: f64,
        /// Output path; `.json` selects JSON, anything else YAML
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Time solves of a random chain across pool sizes
    Bench {
        #[arg(long, default_value_t = 200)]
        size: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 5)]
        runs: usize,
        /// Pool sizes to sweep
        #[arg(long, value_delimiter = ',', default_values_t = [1, 2, 4, 8])]
        threads: Vec<usize>,
        /// Write per-run timings to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    if cli.timing {
        timing::enable_timing();
    }

    match cli.command {
        Commands::Solve {
            chain_path,
            threads,
            sequential,
            csv,
        } => cmd_solve(&chain_path, threads, sequential, csv.as_deref()),
        Commands::Validate { chain_path } => cmd_validate(&chain_path),
        Commands::Generate {
            size,
            seed,
            floor,
            output,
        } => cmd_generate(size, seed, floor, &output),
        Commands::Bench {
            size,
            seed,
            runs,
            threads,
            csv,
        } => cmd_bench(size, seed, runs, &threads, csv.as_deref()),
    }
}

fn cmd_validate(chain_path: &Path) -> CliResult<()> {
    println!("Validating chain: {}", chain_path.display());
    let chain = ss_project::load(chain_path)?;
    let matrix = chain.to_matrix()?;
    println!("✓ Chain is valid ({} states)", matrix.len());
    Ok(())
}

fn cmd_solve(
    chain_path: &Path,
    threads: Option<usize>,
    sequential: bool,
    csv: Option<&Path>,
) -> CliResult<()> {
    let chain = ss_project::load(chain_path)?;
    let matrix = chain.to_matrix()?;

    let mut config = chain.solver.to_config();
    if sequential {
        config = EliminationConfig::sequential();
    } else if let Some(threads) = threads {
        config = EliminationConfig::with_threads(threads);
    }
    info!(chain = %chain.name, states = matrix.len(), schedule = ?config.schedule, "solving");

    elimination_timing::reset_all();
    let start = Instant::now();
    let solution = SteadyStateSolver::new(config.clone()).solve(&matrix)?;
    let elapsed = start.elapsed().as_secs_f64();

    println!("✓ Solved {} ({} states)", chain.name, solution.len());
    let width = chain.labels().iter().map(String::len).max().unwrap_or(0);
    for (label, value) in chain.labels().iter().zip(&solution.values) {
        println!("  π_{:<4} {:<width$}  {:.12}", value.state, label, value.probability);
    }
    println!();
    println!("  Schedule:  {}", describe(&config, matrix.len()));
    println!("  Rounds:    {}", solution.rounds);
    println!("  Σπ:        {:.15}", solution.total());
    println!("  Residual:  {:.3e}", solution.residual(&matrix));
    println!("  Time:      {:.4}s", elapsed);
    elimination_timing::print_summary();

    if let Some(path) = csv {
        write_csv(path, &distribution_csv(&solution, &chain.labels()))?;
        println!("Distribution written to {}", path.display());
    }
    Ok(())
}

fn cmd_generate(size: usize, seed: u64, floor: f64, output: &Path) -> CliResult<()> {
    let matrix = random_column_stochastic(size, floor, seed)?;
    let chain = ChainFile::from_matrix(format!("random-{}-{}", size, seed), &matrix);
    ss_project::save(output, &chain)?;
    println!("✓ Wrote {}-state chain to {}", size, output.display());
    Ok(())
}

fn cmd_bench(
    size: usize,
    seed: u64,
    runs: usize,
    threads: &[usize],
    csv: Option<&Path>,
) -> CliResult<()> {
    println!("Benchmarking {} states, {} runs per pool size", size, runs);
    let results = thread_sweep(size, seed, threads, runs)?;

    for result in &results {
        let agg = &result.aggregate;
        println!(
            "  {:>3} threads: {:.4}s median (min {:.4}s, max {:.4}s), residual {:.2e}",
            result.scenario.mode.threads().unwrap_or(1),
            agg.time_median_s,
            agg.time_min_s,
            agg.time_max_s,
            agg.residual_max
        );
    }
    if results.len() > 1 {
        println!("✓ All {} pool sizes agree", results.len());
    }

    if let Some(path) = csv {
        write_csv(path, &timing_csv(&results))?;
        println!("Timings written to {}", path.display());
    }
    Ok(())
}

fn describe(config: &EliminationConfig, states: usize) -> String {
    match (config.schedule, config.threads) {
        (Schedule::Sequential, _) => "sequential".to_string(),
        (Schedule::Parallel, _) if !config.runs_parallel(states) => {
            format!("sequential (below threshold {})", config.parallel_threshold)
        }
        (Schedule::Parallel, Some(t)) => format!("parallel, {} threads", t),
        (Schedule::Parallel, None) => "parallel, global pool".to_string(),
    }
}
