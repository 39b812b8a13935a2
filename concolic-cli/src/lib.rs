//! Library surface behind the `concolic` binary: the testable logic
//! lives here, `main.rs` is just argument parsing and process exit.

pub mod scenarios;

use concolic_explorer::{explore, CancelToken, ExploreError, ExploreOutcome, ExplorerOptions};
use concolic_record::RecorderConfig;
use concolic_solver::BoundedLinearSolver;
use std::fmt;

/// Everything that can go wrong before or during a scenario run,
/// folded into the exit codes of §6 ("Exit codes of any front-end
/// driver"). `SolverError` (exit `3`) is reserved by that table but
/// unreachable through this engine's own `ExploreError`: per §7 the
/// Explorer only ever propagates `InvalidConfig` and `HostFailure`,
/// the Solver returns sentinels rather than errors.
#[derive(Debug)]
pub enum RunError {
    UnknownScenario(String),
    Explore(ExploreError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::UnknownScenario(name) => {
                write!(f, "unknown scenario '{name}' (run `concolic scenarios` to list them)")
            }
            RunError::Explore(ExploreError::InvalidConfig(error)) => write!(f, "{error}"),
            RunError::Explore(ExploreError::HostFailure { error, .. }) => write!(f, "{error}"),
        }
    }
}

impl RunError {
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::UnknownScenario(_) => 2,
            RunError::Explore(ExploreError::InvalidConfig(_)) => 2,
            RunError::Explore(ExploreError::HostFailure { .. }) => 4,
        }
    }

    /// The partial path records collected before a host failure, if any.
    pub fn partial(&self) -> Option<&[concolic_explorer::PathRecord]> {
        match self {
            RunError::Explore(ExploreError::HostFailure { partial, .. }) => Some(partial.as_slice()),
            _ => None,
        }
    }
}

/// Runs `scenario_name` through the Explorer's fixpoint loop with the
/// given Recorder and Explorer options (§6's recognized options).
pub fn run_scenario(
    scenario_name: &str,
    recorder_config: RecorderConfig,
    max_iterations: u32,
    search_width: u32,
) -> Result<ExploreOutcome, RunError> {
    let scenario = scenarios::find(scenario_name)
        .ok_or_else(|| RunError::UnknownScenario(scenario_name.to_string()))?;

    recorder_config
        .validate()
        .map_err(|error| RunError::Explore(ExploreError::InvalidConfig(error)))?;

    let options = ExplorerOptions::new(max_iterations, BoundedLinearSolver { search_width });
    let cancel = CancelToken::new();
    let initial_seeds = (scenario.initial_seeds)();
    let execute = scenario.execute;

    explore(initial_seeds, |seeds| execute(seeds, recorder_config), &options, &cancel)
        .map_err(RunError::Explore)
}

#[cfg(test)]
mod tests {
    use super::*;
    use concolic_explorer::TerminationReason;

    #[test]
    fn five_case_select_exhausts_with_five_paths() {
        let outcome =
            run_scenario("five-case-select", RecorderConfig::default(), 10, 1000).unwrap();
        assert_eq!(outcome.terminated_reason, TerminationReason::Exhausted);
        assert_eq!(outcome.paths.len(), 5);
    }

    #[test]
    fn unknown_scenario_is_reported_with_exit_code_two() {
        let error = run_scenario("not-a-real-scenario", RecorderConfig::default(), 10, 1000)
            .unwrap_err();
        assert_eq!(error.exit_code(), 2);
        assert!(matches!(error, RunError::UnknownScenario(_)));
    }

    #[test]
    fn zero_max_iterations_is_an_invalid_config_with_exit_code_two() {
        let error =
            run_scenario("single-branch", RecorderConfig::default(), 0, 1000).unwrap_err();
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn zero_recursion_depth_is_an_invalid_config_before_exploring() {
        let config = RecorderConfig { max_recursion_depth: 0, ..RecorderConfig::default() };
        let error = run_scenario("single-branch", config, 10, 1000).unwrap_err();
        assert_eq!(error.exit_code(), 2);
    }
}
