//! Process-wide variable registry: names, declared sorts, and seeds.

use concolic_common::{ConcolicError, ConcolicResult, Sort};
use hashbrown::HashMap;

/// A named, sorted symbolic variable and its current concrete seed.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolicVar {
    pub name: String,
    pub sort: Sort,
}

/// Append-only (within a session) map from variable name to declared
/// sort. Re-declaring a name with a different sort is an error (§3);
/// re-declaring with the same sort is a no-op, matching how hosts
/// re-run `make_symbolic_int` idempotently across executions.
#[derive(Debug, Default)]
pub struct VariableRegistry {
    declared: HashMap<String, Sort>,
}

impl VariableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: impl Into<String>, sort: Sort) -> ConcolicResult<()> {
        if !sort.is_declarable() {
            return Err(ConcolicError::invalid_config(format!(
                "sort {sort} cannot be declared as a symbolic variable"
            )));
        }
        let name = name.into();
        match self.declared.get(&name) {
            Some(existing) if *existing != sort => Err(ConcolicError::invalid_config(format!(
                "variable {name:?} already declared with sort {existing}, cannot redeclare as {sort}"
            ))),
            _ => {
                self.declared.insert(name, sort);
                Ok(())
            }
        }
    }

    pub fn sort_of(&self, name: &str) -> Option<Sort> {
        self.declared.get(name).copied()
    }

    pub fn clear(&mut self) {
        self.declared.clear();
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.declared.keys().map(String::as_str)
    }
}
