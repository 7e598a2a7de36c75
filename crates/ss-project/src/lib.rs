//! ss-project: chain file format, validation and conversion to solver inputs.

pub mod convert;
pub mod schema;
pub mod validate;

pub use schema::*;
pub use validate::{LATEST_VERSION, ValidationError, validate_chain_file};

use std::path::Path;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Solver error: {0}")]
    Solver(#[from] ss_solver::SolverError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &Path) -> ProjectResult<ChainFile> {
    let content = std::fs::read_to_string(path)?;
    let chain: ChainFile = serde_yaml::from_str(&content)?;
    validate_chain_file(&chain)?;
    Ok(chain)
}

pub fn save_yaml(path: &Path, chain: &ChainFile) -> ProjectResult<()> {
    validate_chain_file(chain)?;
    let content = serde_yaml::to_string(chain)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<ChainFile> {
    let content = std::fs::read_to_string(path)?;
    let chain: ChainFile = serde_json::from_str(&content)?;
    validate_chain_file(&chain)?;
    Ok(chain)
}

pub fn save_json(path: &Path, chain: &ChainFile) -> ProjectResult<()> {
    validate_chain_file(chain)?;
    let content = serde_json::to_string_pretty(chain)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load by extension: `.json` is JSON, anything else YAML.
pub fn load(path: &Path) -> ProjectResult<ChainFile> {
    if is_json(path) {
        load_json(path)
    } else {
        load_yaml(path)
    }
}

/// Save by extension: `.json` is JSON, anything else YAML.
pub fn save(path: &Path, chain: &ChainFile) -> ProjectResult<()> {
    if is_json(path) {
        save_json(path, chain)
    } else {
        save_yaml(path, chain)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
