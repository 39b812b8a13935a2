//! The explicit `Session` value (§9): the process-wide state the
//! Recorder and Explorer share, plus a thin default façade for hosts
//! that cannot thread context through every comparison site.

use crate::pathcond::PathCondition;
use concolic_common::{ConcolicError, ConcolicResult, Sort};
use concolic_expr::{LabelRegistry, Tag, VariableRegistry};
use hashbrown::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, OnceLock};
use std::thread::ThreadId;

/// Recognized configuration options (§6).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecorderConfig {
    pub debug: bool,
    pub interception_enabled: bool,
    pub max_recursion_depth: u32,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self { debug: false, interception_enabled: true, max_recursion_depth: 10 }
    }
}

impl RecorderConfig {
    pub fn validate(&self) -> ConcolicResult<()> {
        if self.max_recursion_depth == 0 {
            return Err(ConcolicError::invalid_config(
                "max_recursion_depth must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Per-thread recording state: the PC buffer being built by this
/// thread's in-flight execution, its reentrancy depth, and its
/// constraint timestamp counter (§4.4, §9's "a per-thread counter
/// owned by the Session").
#[derive(Default)]
pub(crate) struct ThreadState {
    pub(crate) pc: PathCondition,
    pub(crate) depth: u32,
    pub(crate) timestamp: u64,
    pub(crate) warned_reentrancy: bool,
}

/// Process-wide state shared by every Recorder call and the Explorer.
/// Per-thread recording state is keyed by `ThreadId` and owned by the
/// `Session` itself, so two independently-constructed `Session`s never
/// see each other's in-flight path condition, and a fresh `Session`
/// always starts with a clean slate on every thread.
pub struct Session {
    labels: LabelRegistry,
    variables: Mutex<VariableRegistry>,
    shutdown: AtomicBool,
    config: Mutex<RecorderConfig>,
    threads: Mutex<HashMap<ThreadId, ThreadState>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(RecorderConfig::default())
    }
}

impl Session {
    pub fn new(config: RecorderConfig) -> Self {
        Self {
            labels: LabelRegistry::new(),
            variables: Mutex::new(VariableRegistry::new()),
            shutdown: AtomicBool::new(false),
            config: Mutex::new(config),
            threads: Mutex::new(HashMap::new()),
        }
    }

    /// Runs `f` against the calling thread's recording state, creating
    /// it on first use. The Recorder is the only other caller.
    pub(crate) fn with_thread_state<R>(&self, f: impl FnOnce(&mut ThreadState) -> R) -> R {
        let mut threads = self.threads.lock().unwrap();
        let state = threads.entry(std::thread::current().id()).or_default();
        f(state)
    }

    /// A snapshot of the calling thread's path condition, for the
    /// host's `execute` callback to hand back to the Explorer (§4.7).
    pub fn snapshot(&self) -> PathCondition {
        self.with_thread_state(|state| state.pc.snapshot())
    }

    /// Empties the calling thread's PC buffer and resets its timestamp
    /// counter, ready for the next execution on this thread.
    pub fn reset_thread_state(&self) {
        self.with_thread_state(|state| {
            state.pc.reset();
            state.timestamp = 0;
        });
    }

    /// The process-wide default session, created lazily on first use.
    pub fn default_session() -> &'static Session {
        static DEFAULT: OnceLock<Session> = OnceLock::new();
        DEFAULT.get_or_init(Session::default)
    }

    pub fn labels(&self) -> &LabelRegistry {
        &self.labels
    }

    pub fn config(&self) -> RecorderConfig {
        *self.config.lock().unwrap()
    }

    pub fn set_config(&self, config: RecorderConfig) -> ConcolicResult<()> {
        config.validate()?;
        *self.config.lock().unwrap() = config;
        Ok(())
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Installed by the host's shutdown hook (§5). Idempotent.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
    }

    fn declare(&self, name: &str, sort: Sort) -> ConcolicResult<Tag> {
        self.variables.lock().unwrap().declare(name, sort)?;
        self.labels.add_label(name);
        Ok(Tag::with_label(name))
    }

    pub fn make_symbolic_int(&self, name: &str) -> ConcolicResult<Tag> {
        self.declare(name, Sort::Int)
    }

    pub fn make_symbolic_real(&self, name: &str) -> ConcolicResult<Tag> {
        self.declare(name, Sort::Real)
    }

    pub fn make_symbolic_string(&self, name: &str) -> ConcolicResult<Tag> {
        self.declare(name, Sort::Str)
    }

    pub fn add_label(&self, label: impl Into<String>) {
        self.labels.add_label(label);
    }

    pub fn sort_of(&self, name: &str) -> Option<Sort> {
        self.variables.lock().unwrap().sort_of(name)
    }

    /// Clears label registrations and variable declarations. Does
    /// *not* touch per-thread PC buffers -- callers reset those
    /// explicitly via `reset_thread_state`.
    pub fn clear_labels(&self) {
        self.labels.clear();
        self.variables.lock().unwrap().clear();
    }

    /// Full session reset: clears declarations/labels, drops all
    /// per-thread recording state, and un-sets `shutting_down`,
    /// matching a host that wants to start a fresh exploration run in
    /// the same process.
    pub fn reset(&self) {
        self.clear_labels();
        self.threads.lock().unwrap().clear();
        self.shutdown.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_symbolic_int_declares_and_labels() {
        let session = Session::default();
        let tag = session.make_symbolic_int("x").unwrap();
        assert!(session.labels().is_user_symbolic(&tag));
        assert_eq!(session.sort_of("x"), Some(Sort::Int));
    }

    #[test]
    fn redeclaring_with_a_different_sort_is_rejected() {
        let session = Session::default();
        session.make_symbolic_int("x").unwrap();
        assert!(session.make_symbolic_real("x").is_err());
    }

    #[test]
    fn reset_clears_labels_and_un_sets_shutdown() {
        let session = Session::default();
        let tag = session.make_symbolic_int("x").unwrap();
        session.shutdown();
        assert!(session.is_shutting_down());

        session.reset();
        assert!(!session.is_shutting_down());
        assert!(!session.labels().is_user_symbolic(&tag));
    }

    #[test]
    fn zero_recursion_depth_is_an_invalid_config() {
        let config = RecorderConfig { max_recursion_depth: 0, ..RecorderConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn a_fresh_session_starts_with_an_empty_snapshot() {
        let session = Session::default();
        assert!(session.snapshot().is_empty());
    }

    #[test]
    fn reset_thread_state_only_touches_the_calling_thread() {
        let session = Session::default();
        session.with_thread_state(|state| state.timestamp = 7);
        session.reset_thread_state();
        session.with_thread_state(|state| assert_eq!(state.timestamp, 0));
    }
}
