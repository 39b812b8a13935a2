//! The fixpoint path exploration driver (C7): runs the host, collects
//! its path condition, negates suffixes, solves, and dedupes.

pub mod cancel;
pub mod explorer;
pub mod options;
pub mod pathrecord;
pub mod termination;

pub use cancel::CancelToken;
pub use explorer::{explore, ExploreError, ExploreOutcome};
pub use options::{ExplorerOptions, MAX_FRESH_VALUE_RETRIES};
pub use pathrecord::PathRecord;
pub use termination::TerminationReason;
