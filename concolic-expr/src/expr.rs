//! The constraint expression algebra (C2): typed expression trees over
//! symbolic variables, constants, and comparison/boolean/arithmetic
//! operators.

use concolic_common::{ConcolicError, ConcolicResult, Sort};
use std::fmt;

/// Binary operators. Comparisons yield `Bool`; `AND`/`OR` require and
/// yield `Bool`; the arithmetic operators require and yield a common
/// numeric sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

/// Unary operators: `Not` wraps a boolean expression, `Neg` wraps a
/// numeric one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnOp {
    Not,
    Neg,
}

impl Op {
    pub fn is_comparison(self) -> bool {
        matches!(self, Op::Eq | Op::Ne | Op::Lt | Op::Le | Op::Gt | Op::Ge)
    }

    pub fn is_boolean_connective(self) -> bool {
        matches!(self, Op::And | Op::Or)
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(self, Op::Add | Op::Sub | Op::Mul | Op::Div | Op::Rem)
    }

    /// The operator obtained by swapping the two operands of a
    /// comparison (`GT <-> LT`, `GE <-> LE`; `EQ`/`NE` are fixed).
    /// Only meaningful for comparisons; non-comparison operators are
    /// returned unchanged since nothing in this engine flips them.
    pub fn flip(self) -> Op {
        match self {
            Op::Lt => Op::Gt,
            Op::Gt => Op::Lt,
            Op::Le => Op::Ge,
            Op::Ge => Op::Le,
            other => other,
        }
    }

    /// The complement of a comparison operator (`EQ <-> NE`,
    /// `LT <-> GE`, `LE <-> GT`), used by the Negator.
    pub fn complement(self) -> Option<Op> {
        match self {
            Op::Eq => Some(Op::Ne),
            Op::Ne => Some(Op::Eq),
            Op::Lt => Some(Op::Ge),
            Op::Ge => Some(Op::Lt),
            Op::Le => Some(Op::Gt),
            Op::Gt => Some(Op::Le),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Op::Eq => "==",
            Op::Ne => "!=",
            Op::Lt => "<",
            Op::Le => "<=",
            Op::Gt => ">",
            Op::Ge => ">=",
            Op::And => "&&",
            Op::Or => "||",
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
            Op::Rem => "%",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// An algebraic constraint expression.
///
/// Expressions are immutable once constructed and shared by structural
/// reference (they form a DAG, never a cycle): cloning is cheap because
/// subtrees live behind `Box` and structural equality is derived
/// directly rather than hand-rolled.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Var(String, Sort),
    IntConst(i64),
    RealConst(f64),
    StrConst(String),
    Binary(Op, Box<Expr>, Box<Expr>),
    Unary(UnOp, Box<Expr>),
}

impl Expr {
    pub fn var(name: impl Into<String>, sort: Sort) -> Self {
        Expr::Var(name.into(), sort)
    }

    pub fn int(value: i64) -> Self {
        Expr::IntConst(value)
    }

    pub fn real(value: f64) -> Self {
        Expr::RealConst(value)
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::StrConst(value.into())
    }

    /// The canonical `TRUE` expression used as the empty conjunction
    /// (§4.3's `as_conjunction()` on an empty buffer). The algebra has
    /// no dedicated boolean literal, so `0 == 0` stands in for it.
    pub fn truth() -> Self {
        Expr::Binary(Op::Eq, Box::new(Expr::IntConst(0)), Box::new(Expr::IntConst(0)))
    }

    /// Build a binary expression, validating sorts up front
    /// (§4.2's "sort inference that fails fast on malformed
    /// compositions"). Callers that already know the operands are
    /// well-sorted may still prefer this over the raw variant so the
    /// invariant is checked once, at construction time.
    pub fn binary(op: Op, left: Expr, right: Expr) -> ConcolicResult<Self> {
        let expr = Expr::Binary(op, Box::new(left), Box::new(right));
        expr.sort()?;
        Ok(expr)
    }

    pub fn unary(op: UnOp, operand: Expr) -> ConcolicResult<Self> {
        let expr = Expr::Unary(op, Box::new(operand));
        expr.sort()?;
        Ok(expr)
    }

    /// Infer this expression's sort, failing on malformed compositions:
    /// `NOT` only wraps booleans, `NEG` only wraps numerics, `AND`/`OR`
    /// require boolean operands, arithmetic operators require a common
    /// numeric sort, and comparisons require either equal sorts or two
    /// numeric sorts (which coerce to `Real`, per §3).
    pub fn sort(&self) -> ConcolicResult<Sort> {
        match self {
            Expr::Var(_, sort) => Ok(*sort),
            Expr::IntConst(_) => Ok(Sort::Int),
            Expr::RealConst(_) => Ok(Sort::Real),
            Expr::StrConst(_) => Ok(Sort::Str),
            Expr::Unary(UnOp::Not, operand) => {
                let inner = operand.sort()?;
                if inner == Sort::Bool {
                    Ok(Sort::Bool)
                } else {
                    Err(ConcolicError::sort_mismatch(format!(
                        "NOT requires a boolean operand, got {inner}"
                    )))
                }
            }
            Expr::Unary(UnOp::Neg, operand) => {
                let inner = operand.sort()?;
                if inner.is_numeric() {
                    Ok(inner)
                } else {
                    Err(ConcolicError::sort_mismatch(format!(
                        "NEG requires a numeric operand, got {inner}"
                    )))
                }
            }
            Expr::Binary(op, left, right) => {
                let l = left.sort()?;
                let r = right.sort()?;
                Self::binary_sort(*op, l, r)
            }
        }
    }

    fn binary_sort(op: Op, l: Sort, r: Sort) -> ConcolicResult<Sort> {
        if op.is_comparison() {
            if l == r {
                return Ok(Sort::Bool);
            }
            return l
                .coerce_numeric(r)
                .map(|_| Sort::Bool)
                .ok_or_else(|| {
                    ConcolicError::sort_mismatch(format!(
                        "cannot compare {l} with {r}"
                    ))
                });
        }
        if op.is_boolean_connective() {
            return if l == Sort::Bool && r == Sort::Bool {
                Ok(Sort::Bool)
            } else {
                Err(ConcolicError::sort_mismatch(format!(
                    "{op} requires boolean operands, got {l} and {r}"
                )))
            };
        }
        debug_assert!(op.is_arithmetic());
        l.coerce_numeric(r).ok_or_else(|| {
            ConcolicError::sort_mismatch(format!(
                "{op} requires numeric operands, got {l} and {r}"
            ))
        })
    }

    /// Stable, human-readable printed form used in diagnostics and in
    /// the persisted JSON `constraints` field.
    pub fn print(&self) -> String {
        match self {
            Expr::Var(name, _) => name.clone(),
            Expr::IntConst(i) => i.to_string(),
            Expr::RealConst(r) => {
                if r.fract() == 0.0 && r.is_finite() {
                    format!("{r:.1}")
                } else {
                    r.to_string()
                }
            }
            Expr::StrConst(s) => format!("{s:?}"),
            Expr::Binary(op, l, r) => format!("({} {} {})", l.print(), op, r.print()),
            Expr::Unary(UnOp::Not, x) => format!("!{}", x.print()),
            Expr::Unary(UnOp::Neg, x) => format!("-{}", x.print()),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.print())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_swaps_directional_comparisons() {
        assert_eq!(Op::Gt.flip(), Op::Lt);
        assert_eq!(Op::Lt.flip(), Op::Gt);
        assert_eq!(Op::Ge.flip(), Op::Le);
        assert_eq!(Op::Le.flip(), Op::Ge);
        assert_eq!(Op::Eq.flip(), Op::Eq);
        assert_eq!(Op::Ne.flip(), Op::Ne);
    }

    #[test]
    fn complement_table_matches_spec() {
        assert_eq!(Op::Eq.complement(), Some(Op::Ne));
        assert_eq!(Op::Lt.complement(), Some(Op::Ge));
        assert_eq!(Op::Le.complement(), Some(Op::Gt));
        assert_eq!(Op::And.complement(), None);
    }

    #[test]
    fn comparison_sort_is_boolean() {
        let e = Expr::binary(Op::Lt, Expr::var("x", Sort::Int), Expr::int(10)).unwrap();
        assert_eq!(e.sort().unwrap(), Sort::Bool);
    }

    #[test]
    fn mixed_int_real_comparison_coerces() {
        let e = Expr::binary(Op::Lt, Expr::var("x", Sort::Int), Expr::real(1.5)).unwrap();
        assert_eq!(e.sort().unwrap(), Sort::Bool);
    }

    #[test]
    fn string_and_int_comparison_is_a_sort_mismatch() {
        let err = Expr::binary(Op::Lt, Expr::var("x", Sort::Int), Expr::string("abc"));
        assert!(err.is_err());
    }

    #[test]
    fn and_requires_boolean_operands() {
        let cond = Expr::binary(Op::Gt, Expr::var("x", Sort::Int), Expr::int(0)).unwrap();
        let ok = Expr::binary(Op::And, cond.clone(), cond.clone());
        assert!(ok.is_ok());

        let bad = Expr::binary(Op::And, Expr::int(1), cond);
        assert!(bad.is_err());
    }

    #[test]
    fn not_requires_boolean_unary_operand() {
        let cond = Expr::binary(Op::Gt, Expr::var("x", Sort::Int), Expr::int(0)).unwrap();
        assert!(Expr::unary(UnOp::Not, cond).is_ok());
        assert!(Expr::unary(UnOp::Not, Expr::int(5)).is_err());
    }

    #[test]
    fn neg_requires_numeric_unary_operand() {
        assert!(Expr::unary(UnOp::Neg, Expr::int(5)).is_ok());
        assert!(Expr::unary(UnOp::Neg, Expr::string("abc")).is_err());
    }

    #[test]
    fn print_matches_the_stable_grammar() {
        let e = Expr::binary(Op::Gt, Expr::var("x", Sort::Int), Expr::int(10)).unwrap();
        assert_eq!(e.print(), "(x > 10)");

        let not_e = Expr::unary(UnOp::Not, e).unwrap();
        assert_eq!(not_e.print(), "!(x > 10)");

        assert_eq!(Expr::real(5.0).print(), "5.0");
        assert_eq!(Expr::string("abc").print(), "\"abc\"");
    }

    #[test]
    fn structural_equality_is_whole_tree() {
        let a = Expr::binary(Op::Eq, Expr::var("x", Sort::Int), Expr::int(1)).unwrap();
        let b = Expr::binary(Op::Eq, Expr::var("x", Sort::Int), Expr::int(1)).unwrap();
        let c = Expr::binary(Op::Eq, Expr::var("x", Sort::Int), Expr::int(2)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn truth_is_the_empty_conjunction_identity() {
        assert_eq!(Expr::truth().sort().unwrap(), Sort::Bool);
        assert_eq!(Expr::truth().print(), "(0 == 0)");
    }
}
