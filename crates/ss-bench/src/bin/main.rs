//! Standalone benchmark runner.

use ss_bench::{BenchmarkSuite, default_benchmarks, run_scenario, timing_csv, write_csv};
use std::fs;
use std::path::PathBuf;

const RUNS: usize = 5;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Repo root is two levels up from the crate root.
    let crate_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let repo_root = crate_path
        .parent()
        .and_then(|p| p.parent())
        .ok_or("Could not determine repo root")?
        .to_path_buf();

    println!("Steady-State Benchmark Suite");
    println!("============================\n");

    let benchmarks = default_benchmarks();
    println!("Running {} benchmarks, {} runs each...\n", benchmarks.len(), RUNS);

    let mut results = Vec::new();
    for (idx, scenario) in benchmarks.iter().enumerate() {
        print!("[{}/{}] {} ... ", idx + 1, benchmarks.len(), scenario.name);
        std::io::Write::flush(&mut std::io::stdout())?;

        match run_scenario(scenario, RUNS) {
            Ok(result) => {
                println!("OK ({:.4}s median)", result.aggregate.time_median_s);
                results.push(result);
            }
            Err(e) => {
                println!("FAILED");
                eprintln!("  Error: {}", e);
            }
        }
    }

    println!("\n============================");
    println!("Benchmark Results Summary");
    println!("============================\n");
    for result in &results {
        let agg = &result.aggregate;
        println!("{}", result.scenario.name);
        println!("  Mode: {:?}", result.scenario.mode);
        println!(
            "  Time:     {:.4}s (median), min: {:.4}s, max: {:.4}s",
            agg.time_median_s, agg.time_min_s, agg.time_max_s
        );
        println!("  Residual: {:.2e} (max)", agg.residual_max);
        println!();
    }

    let bench_dir = repo_root.join("benchmarks");
    fs::create_dir_all(&bench_dir)?;

    let csv_path = bench_dir.join("timings.csv");
    write_csv(&csv_path, &timing_csv(&results))?;

    let baseline_path = bench_dir.join("baseline.json");
    let baseline_json = serde_json::to_string_pretty(&BenchmarkSuite::new(results))?;
    fs::write(&baseline_path, baseline_json)?;

    println!("Timings saved to:  {}", csv_path.display());
    println!("Baseline saved to: {}", baseline_path.display());
    Ok(())
}
