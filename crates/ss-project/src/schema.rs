//! Chain file schema definitions.

use serde::{Deserialize, Serialize};

/// A Markov chain on disk.
///
/// The coefficients come either as dense `matrix` rows (row `i` = inflow into
/// state `i`) or as sparse `transitions`; exactly one must be present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChainFile {
    pub version: u32,
    pub name: String,
    /// Optional state labels, one per state
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub states: Vec<String>,
    /// State count for sparse chains without labels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix: Option<Vec<Vec<f64>>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transitions: Vec<TransitionDef>,
    #[serde(default)]
    pub solver: SolverDef,
}

/// Probability of moving `from -> to` in one step. Repeated pairs add up.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TransitionDef {
    pub from: usize,
    pub to: usize,
    pub probability: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleDef {
    Sequential,
    #[default]
    Parallel,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolverDef {
    #[serde(default)]
    pub schedule: ScheduleDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

impl Default for SolverDef {
    fn default() -> Self {
        Self {
            schedule: ScheduleDef::default(),
            threads: None,
            parallel_threshold: default_parallel_threshold(),
        }
    }
}

fn default_parallel_threshold() -> usize {
    ss_solver::EliminationConfig::default().parallel_threshold
}
