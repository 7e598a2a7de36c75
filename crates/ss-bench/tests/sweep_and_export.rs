use ss_bench::{
    BenchmarkMode, BenchmarkScenario, distribution_csv, run_scenario, thread_sweep, timing_csv,
    write_csv,
};
use ss_solver::solve_rows;

#[test]
fn thread_sweep_agrees_across_pool_sizes() {
    let results = thread_sweep(60, 11, &[1, 2, 4], 2).unwrap();
    assert_eq!(results.len(), 3);
    for result in &results {
        assert_eq!(result.aggregate.run_count, 2);
        assert!(result.runs.iter().all(|r| (r.total - 1.0).abs() < 1e-9));
    }
    assert_eq!(results[2].scenario.mode, BenchmarkMode::Parallel { threads: 4 });
}

#[test]
fn timing_csv_has_one_row_per_run() {
    let scenario = BenchmarkScenario {
        id: "csv".to_string(),
        name: "csv".to_string(),
        size: 5,
        seed: 1,
        mode: BenchmarkMode::Sequential,
    };
    let result = run_scenario(&scenario, 4).unwrap();
    let csv = timing_csv(&[result]);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "scenario,size,threads,run,time_s,rounds,residual");
    assert_eq!(lines.len(), 5);
    assert!(lines[1].starts_with("csv,5,seq,0,"));
}

#[test]
fn distribution_csv_labels_states() {
    let solution = solve_rows(&[vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
    let csv = distribution_csv(&solution, &["up".to_string()]);
    assert_eq!(csv, "state,label,probability\n0,up,0.5\n1,s1,0.5\n");
}

#[test]
fn distribution_csv_quotes_labels_with_commas() {
    let solution = solve_rows(&[vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
    let labels = vec!["low, idle".to_string(), "\"busy\"".to_string()];
    let csv = distribution_csv(&solution, &labels);
    assert_eq!(
        csv,
        "state,label,probability\n0,\"low, idle\",0.5\n1,\"\"\"busy\"\"\",0.5\n"
    );
}

#[test]
fn write_csv_replaces_existing_file() {
    let path = std::env::temp_dir().join(format!("ss_bench_{}_out.csv", std::process::id()));
    write_csv(&path, "first,second\n1,2\n").unwrap();
    write_csv(&path, "a\n").unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\n");
    std::fs::remove_file(&path).ok();
}
