//! The sorts (types) that flow through the expression algebra.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A value sort recognized by the expression algebra.
///
/// Symbolic variables may only be declared with sort `Int`, `Real`, or
/// `Str` (§3: "A named identity with a declared sort (integer, real,
/// string)"); `Bool` never appears as a declared variable sort, only as
/// the result sort of a comparison or boolean connective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sort {
    Int,
    Real,
    Str,
    Bool,
}

impl Sort {
    /// Whether this sort may be used in arithmetic operators.
    pub fn is_numeric(self) -> bool {
        matches!(self, Sort::Int | Sort::Real)
    }

    /// Whether this sort is legal as a declared symbolic variable's sort.
    pub fn is_declarable(self) -> bool {
        matches!(self, Sort::Int | Sort::Real | Sort::Str)
    }

    /// The sort obtained when mixing `self` with `other` in a numeric
    /// comparison, per §3's "mixing an integer and a real constant in a
    /// comparison coerces to real." Returns `None` when the two sorts
    /// have no common numeric sort.
    pub fn coerce_numeric(self, other: Sort) -> Option<Sort> {
        match (self, other) {
            (Sort::Int, Sort::Int) => Some(Sort::Int),
            (Sort::Real, Sort::Real) => Some(Sort::Real),
            (Sort::Int, Sort::Real) | (Sort::Real, Sort::Int) => Some(Sort::Real),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Sort::Int => "Int",
            Sort::Real => "Real",
            Sort::Str => "Str",
            Sort::Bool => "Bool",
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_coercion_promotes_to_real() {
        assert_eq!(Sort::Int.coerce_numeric(Sort::Int), Some(Sort::Int));
        assert_eq!(Sort::Int.coerce_numeric(Sort::Real), Some(Sort::Real));
        assert_eq!(Sort::Real.coerce_numeric(Sort::Int), Some(Sort::Real));
        assert_eq!(Sort::Str.coerce_numeric(Sort::Int), None);
    }

    #[test]
    fn bool_is_not_declarable() {
        assert!(!Sort::Bool.is_declarable());
        assert!(Sort::Int.is_declarable());
        assert!(Sort::Str.is_declarable());
    }
}
