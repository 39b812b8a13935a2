//! One explored execution, kept for deduplication and §6's output.

use concolic_expr::eval::Assignment;
use serde::Serialize;

/// `{seed_inputs, path_condition, outcome_summary, duration}` (§3),
/// specialized to the printed-expression form the output schema
/// wants rather than the live `Expr` tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathRecord {
    pub seeds: Assignment,
    pub constraints: Vec<String>,
    pub duration_ns: u64,
}

impl PathRecord {
    pub fn new(seeds: Assignment, constraints: Vec<String>, duration_ns: u64) -> Self {
        Self { seeds, constraints, duration_ns }
    }
}
