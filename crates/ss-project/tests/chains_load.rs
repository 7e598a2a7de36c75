use ss_project::load_yaml;
use ss_solver::SteadyStateSolver;
use std::path::PathBuf;

fn chains_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../chains")
}

#[test]
fn bundled_chains_load_and_solve() {
    let mut found = 0;
    for entry in std::fs::read_dir(chains_dir()).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
            continue;
        }
        let chain = load_yaml(&path).unwrap_or_else(|e| panic!("{}: {}", path.display(), e));
        let matrix = chain.to_matrix().unwrap();
        let solution = SteadyStateSolver::new(chain.solver.to_config())
            .solve(&matrix)
            .unwrap();
        assert_eq!(solution.len(), chain.state_count());
        assert!((solution.total() - 1.0).abs() < 1e-9);
        assert!(solution.residual(&matrix) < 1e-9);
        found += 1;
    }
    assert!(found >= 2);
}

#[test]
fn weather_chain_matches_known_distribution() {
    let chain = load_yaml(&chains_dir().join("weather.yaml")).unwrap();
    let matrix = chain.to_matrix().unwrap();
    let solution = SteadyStateSolver::new(chain.solver.to_config())
        .solve(&matrix)
        .unwrap();
    let expected = [19.0 / 69.0, 33.0 / 69.0, 17.0 / 69.0];
    for (got, want) in solution.probabilities().iter().zip(expected) {
        assert!((got - want).abs() < 1e-9, "{} vs {}", got, want);
    }
    assert_eq!(chain.labels(), vec!["sunny", "cloudy", "rainy"]);
}

#[test]
fn random_walk_is_uniform() {
    let chain = load_yaml(&chains_dir().join("gambler.yaml")).unwrap();
    let solution = SteadyStateSolver::new(chain.solver.to_config())
        .solve(&chain.to_matrix().unwrap())
        .unwrap();
    for p in solution.probabilities() {
        assert!((p - 0.25).abs() < 1e-12);
    }
}
