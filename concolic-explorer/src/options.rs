//! Session inputs for one `explore` run (§4.7, §6).

use concolic_solver::{BoundedLinearSolver, Solve};

/// Before accepting a freshly solved assignment that repeats a
/// previously tried one, the Explorer retries with an added
/// disequality at most this many times before discarding the
/// candidate (§4.7's "Deduplication of solutions").
pub const MAX_FRESH_VALUE_RETRIES: u32 = 4;

/// `max_iterations` (default 100) and the solving capability
/// (§6's "Options"). `search_width` is a property of the solver
/// itself rather than of the Explorer, so it lives on whichever
/// `Solve` implementation is plugged in here.
#[derive(Debug, Clone)]
pub struct ExplorerOptions<S: Solve = BoundedLinearSolver> {
    pub max_iterations: u32,
    pub solver: S,
}

impl<S: Solve + Default> Default for ExplorerOptions<S> {
    fn default() -> Self {
        Self { max_iterations: 100, solver: S::default() }
    }
}

impl<S: Solve> ExplorerOptions<S> {
    pub fn new(max_iterations: u32, solver: S) -> Self {
        Self { max_iterations, solver }
    }
}
