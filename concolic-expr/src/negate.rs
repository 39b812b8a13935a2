//! The Negator (C5): structural negation of constraint expressions.

use crate::expr::{Expr, Op, UnOp};

/// Return an expression logically equivalent to `¬expr`.
///
/// `negate` is total and pure: it never fails and never evaluates the
/// expression. It pushes `NOT` through boolean connectives (De Morgan),
/// flips comparison operators to their complement, eliminates double
/// negation, and otherwise falls back to wrapping the expression in
/// `NOT`.
pub fn negate(expr: &Expr) -> Expr {
    match expr {
        Expr::Binary(op, left, right) if op.is_comparison() => {
            let complement = op
                .complement()
                .expect("comparison operators always have a complement");
            Expr::Binary(complement, left.clone(), right.clone())
        }
        Expr::Binary(Op::And, left, right) => {
            Expr::Binary(Op::Or, Box::new(negate(left)), Box::new(negate(right)))
        }
        Expr::Binary(Op::Or, left, right) => {
            Expr::Binary(Op::And, Box::new(negate(left)), Box::new(negate(right)))
        }
        Expr::Unary(UnOp::Not, inner) => (**inner).clone(),
        other => Expr::Unary(UnOp::Not, Box::new(other.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concolic_common::Sort;

    fn gt(name: &str, k: i64) -> Expr {
        Expr::binary(Op::Gt, Expr::var(name, Sort::Int), Expr::int(k)).unwrap()
    }

    fn lt(name: &str, k: i64) -> Expr {
        Expr::binary(Op::Lt, Expr::var(name, Sort::Int), Expr::int(k)).unwrap()
    }

    #[test]
    fn negate_flips_comparisons_via_complement_table() {
        assert_eq!(negate(&gt("x", 0)), Expr::binary(Op::Le, Expr::var("x", Sort::Int), Expr::int(0)).unwrap());
        let eq = Expr::binary(Op::Eq, Expr::var("x", Sort::Int), Expr::int(5)).unwrap();
        assert_eq!(negate(&eq), Expr::binary(Op::Ne, Expr::var("x", Sort::Int), Expr::int(5)).unwrap());
    }

    #[test]
    fn de_morgan_over_and() {
        let t = Expr::binary(Op::And, gt("x", 0), lt("y", 10)).unwrap();
        let negated = negate(&t);
        let expected = Expr::binary(
            Op::Or,
            Expr::binary(Op::Le, Expr::var("x", Sort::Int), Expr::int(0)).unwrap(),
            Expr::binary(Op::Ge, Expr::var("y", Sort::Int), Expr::int(10)).unwrap(),
        )
        .unwrap();
        assert_eq!(negated, expected);
    }

    #[test]
    fn de_morgan_over_or() {
        let t = Expr::binary(Op::Or, gt("x", 0), lt("y", 10)).unwrap();
        let negated = negate(&t);
        let expected = Expr::binary(
            Op::And,
            Expr::binary(Op::Le, Expr::var("x", Sort::Int), Expr::int(0)).unwrap(),
            Expr::binary(Op::Ge, Expr::var("y", Sort::Int), Expr::int(10)).unwrap(),
        )
        .unwrap();
        assert_eq!(negated, expected);
    }

    #[test]
    fn double_negation_elimination() {
        let e = gt("x", 0);
        let not_e = Expr::unary(UnOp::Not, e.clone()).unwrap();
        assert_eq!(negate(&not_e), e);
    }

    #[test]
    fn negate_is_an_involution_on_comparisons() {
        let e = gt("x", 0);
        assert_eq!(negate(&negate(&e)), e);
    }

    #[test]
    fn negate_is_an_involution_on_boolean_compositions() {
        let t = Expr::binary(Op::And, gt("x", 0), lt("y", 10)).unwrap();
        assert_eq!(negate(&negate(&t)), t);
    }
}
