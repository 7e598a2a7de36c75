//! CSV exporters for timing runs and solved distributions.

use crate::{BenchResult, BenchmarkResult};
use ss_solver::SteadySolution;
use std::path::Path;

/// One row per run: `scenario,size,threads,run,time_s,rounds,residual`.
pub fn timing_csv(results: &[BenchmarkResult]) -> String {
    let mut csv = String::from("scenario,size,threads,run,time_s,rounds,residual\n");
    for result in results {
        let threads = result
            .scenario
            .mode
            .threads()
            .map_or_else(|| "seq".to_string(), |t| t.to_string());
        for (idx, run) in result.runs.iter().enumerate() {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{}\n",
                result.scenario.id,
                result.scenario.size,
                threads,
                idx,
                run.time_s,
                run.rounds,
                run.residual
            ));
        }
    }
    csv
}

/// `state,label,probability`, one row per state. Missing labels become `s<index>`.
pub fn distribution_csv(solution: &SteadySolution, labels: &[String]) -> String {
    let mut csv = String::from("state,label,probability\n");
    for value in &solution.values {
        let label = labels
            .get(value.state)
            .cloned()
            .unwrap_or_else(|| format!("s{}", value.state));
        csv.push_str(&format!(
            "{},{},{}\n",
            value.state,
            csv_field(&label),
            value.probability
        ));
    }
    csv
}

/// Quote a field holding a comma, quote or line break; inner quotes are doubled.
fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

/// Write `content` to `path`, replacing any existing file.
pub fn write_csv(path: &Path, content: &str) -> BenchResult<()> {
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}
