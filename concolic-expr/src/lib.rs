//! Tag/label registry, expression algebra, and negation for the
//! concolic path exploration engine (components C1, C2, C5).

pub mod eval;
pub mod expr;
pub mod negate;
pub mod tag;
pub mod variable;

pub use expr::{Expr, Op, UnOp};
pub use negate::negate;
pub use tag::{LabelRegistry, Tag};
pub use variable::{SymbolicVar, VariableRegistry};
