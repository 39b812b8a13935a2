//! Why `explore` stopped (§6's `terminated_reason`).

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// The work queue emptied with no unsolved candidates left.
    Exhausted,
    /// `max_iterations` host executions were reached first.
    MaxIterations,
    /// The caller's `CancelToken` was set between iterations.
    Cancelled,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TerminationReason::Exhausted => "exhausted",
            TerminationReason::MaxIterations => "max_iterations",
            TerminationReason::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_the_output_schema_strings() {
        assert_eq!(TerminationReason::Exhausted.to_string(), "exhausted");
        assert_eq!(TerminationReason::MaxIterations.to_string(), "max_iterations");
        assert_eq!(TerminationReason::Cancelled.to_string(), "cancelled");
    }
}
