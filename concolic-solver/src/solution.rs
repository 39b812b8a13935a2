//! The solver's result type (§3): a concrete assignment, or one of
//! the two sentinels that stand in for "no error, no answer".

use concolic_expr::eval::Value;
use hashbrown::HashMap;

/// A mapping from variable name to a concrete value of that
/// variable's declared sort. Never constructed empty on the `Sat`
/// side -- an empty assignment is represented by `Unsat`, not by
/// `Sat` with zero entries.
#[derive(Debug, Clone, PartialEq)]
pub enum Solution {
    Sat(HashMap<String, Value>),
    /// The conjunction has no satisfying assignment within the
    /// solver's search window.
    Unsat,
    /// The formula contains an atom this solver cannot reason about
    /// (a real/string comparison, a non-linear term). Treated like
    /// `Unsat` by the Explorer but distinguished for diagnostics.
    Unsupported,
}

impl Solution {
    pub fn is_sat(&self) -> bool {
        matches!(self, Solution::Sat(_))
    }

    pub fn assignment(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Solution::Sat(assignment) => Some(assignment),
            _ => None,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.assignment().and_then(|a| a.get(name))
    }
}
