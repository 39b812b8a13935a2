//! The concrete+tagged operand the host passes at a comparison site.

use concolic_common::Sort;
use concolic_expr::eval::Value;
use concolic_expr::{Expr, Tag};

/// One side of a comparison as the host sees it: a concrete value,
/// optionally paired with the symbolic variable it denotes.
///
/// Relevance is decided by the tag alone (§4.1) -- `symbol` is carried
/// here only so the Recorder does not need a registry lookup to turn a
/// relevant operand into a `Var` node.
#[derive(Debug, Clone, PartialEq)]
pub struct Operand {
    tag: Tag,
    symbol: Option<(String, Sort)>,
    value: Value,
}

impl Operand {
    /// An operand with no symbolic provenance at all.
    pub fn concrete(value: Value) -> Self {
        Self { tag: Tag::empty(), symbol: None, value }
    }

    /// An operand that denotes a declared symbolic variable.
    pub fn symbolic(name: impl Into<String>, sort: Sort, value: Value) -> Self {
        let name = name.into();
        Self { tag: Tag::with_label(name.clone()), symbol: Some((name, sort)), value }
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.value {
            Value::Int(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.value {
            Value::Real(r) => Some(r),
            Value::Int(i) => Some(i as f64),
            _ => None,
        }
    }

    /// The zero literal of this operand's sort, for unary
    /// against-zero branch tests (`IFEQ`/`IFLT`/...).
    pub fn zero_literal(&self) -> Expr {
        let sort = self.symbol.as_ref().map(|(_, s)| *s).unwrap_or(match self.value {
            Value::Real(_) => Sort::Real,
            _ => Sort::Int,
        });
        match sort {
            Sort::Real => Expr::real(0.0),
            _ => Expr::int(0),
        }
    }

    /// The `Expr` this operand contributes to a constraint: the
    /// declared variable if it carries one, otherwise a literal built
    /// from its concrete value.
    pub fn to_expr(&self) -> Expr {
        if let Some((name, sort)) = &self.symbol {
            return Expr::var(name.clone(), *sort);
        }
        match &self.value {
            Value::Int(i) => Expr::int(*i),
            Value::Real(r) => Expr::real(*r),
            Value::Str(s) => Expr::string(s.clone()),
            Value::Bool(b) => Expr::int(if *b { 1 } else { 0 }),
        }
    }
}
