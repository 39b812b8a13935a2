//! Error taxonomy shared by every stage of the concolic engine.

use thiserror::Error;

/// The error type produced by the concolic engine's core crates.
///
/// Each variant corresponds to one failure class named in the error
/// taxonomy: `InvalidConfig` and `HostFailure` are fatal to the calling
/// session; `SortMismatch` and `RecorderReentrancy` are recoverable by
/// the component that raised them (the Recorder degrades to a no-op
/// rather than propagating). `SolverBounded` is logged but otherwise
/// treated like UNSAT by the Explorer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConcolicError {
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("sort mismatch: {message}")]
    SortMismatch { message: String },

    #[error("recorder reentrancy bound exceeded at depth {depth}")]
    RecorderReentrancy { depth: usize },

    #[error("solver search window exhausted: {message}")]
    SolverBounded { message: String },

    #[error("host execution failed: {message}")]
    HostFailure { message: String },
}

/// Result type alias used throughout the engine's core crates.
pub type ConcolicResult<T> = Result<T, ConcolicError>;

impl ConcolicError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig { message: message.into() }
    }

    pub fn sort_mismatch(message: impl Into<String>) -> Self {
        Self::SortMismatch { message: message.into() }
    }

    pub fn recorder_reentrancy(depth: usize) -> Self {
        Self::RecorderReentrancy { depth }
    }

    pub fn solver_bounded(message: impl Into<String>) -> Self {
        Self::SolverBounded { message: message.into() }
    }

    pub fn host_failure(message: impl Into<String>) -> Self {
        Self::HostFailure { message: message.into() }
    }

    /// Whether this error should abort the whole explorer session
    /// rather than just the call that produced it.
    pub fn is_fatal_to_session(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. } | Self::HostFailure { .. })
    }
}
