//! Concrete evaluation of expressions under an assignment.
//!
//! Not part of the recording hot path -- the host, not this engine,
//! computes concrete results. This exists so properties like "negate
//! is semantically sound" (§8) can be checked against a ground truth.

use crate::expr::{Expr, Op, UnOp};
use concolic_common::{ConcolicError, ConcolicResult};
use hashbrown::HashMap;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Real(f64),
    Str(String),
    Bool(bool),
}

impl Value {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Real(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> ConcolicResult<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(ConcolicError::sort_mismatch(format!(
                "expected a boolean value, got {other:?}"
            ))),
        }
    }
}

pub type Assignment = HashMap<String, Value>;

/// Evaluate `expr` under `assignment`. Fails if a variable is unbound
/// or an operator is applied to an operand of the wrong kind.
pub fn evaluate(expr: &Expr, assignment: &Assignment) -> ConcolicResult<Value> {
    match expr {
        Expr::Var(name, _) => assignment.get(name).cloned().ok_or_else(|| {
            ConcolicError::sort_mismatch(format!("unbound variable {name:?}"))
        }),
        Expr::IntConst(i) => Ok(Value::Int(*i)),
        Expr::RealConst(r) => Ok(Value::Real(*r)),
        Expr::StrConst(s) => Ok(Value::Str(s.clone())),
        Expr::Unary(UnOp::Not, inner) => Ok(Value::Bool(!evaluate(inner, assignment)?.as_bool()?)),
        Expr::Unary(UnOp::Neg, inner) => match evaluate(inner, assignment)? {
            Value::Int(i) => Ok(Value::Int(-i)),
            Value::Real(r) => Ok(Value::Real(-r)),
            other => Err(ConcolicError::sort_mismatch(format!(
                "NEG applied to non-numeric value {other:?}"
            ))),
        },
        Expr::Binary(op, left, right) => {
            let l = evaluate(left, assignment)?;
            let r = evaluate(right, assignment)?;
            eval_binary(*op, l, r)
        }
    }
}

fn eval_binary(op: Op, l: Value, r: Value) -> ConcolicResult<Value> {
    if op.is_boolean_connective() {
        let (lb, rb) = (l.as_bool()?, r.as_bool()?);
        return Ok(Value::Bool(match op {
            Op::And => lb && rb,
            Op::Or => lb || rb,
            _ => unreachable!(),
        }));
    }

    if op.is_comparison() {
        return eval_comparison(op, l, r);
    }

    debug_assert!(op.is_arithmetic());
    let (lf, rf) = (
        l.as_f64().ok_or_else(|| ConcolicError::sort_mismatch("non-numeric operand to arithmetic op".into()))?,
        r.as_f64().ok_or_else(|| ConcolicError::sort_mismatch("non-numeric operand to arithmetic op".into()))?,
    );
    let result = match op {
        Op::Add => lf + rf,
        Op::Sub => lf - rf,
        Op::Mul => lf * rf,
        Op::Div => lf / rf,
        Op::Rem => lf % rf,
        _ => unreachable!(),
    };
    if matches!((l, r), (Value::Int(_), Value::Int(_))) && matches!(op, Op::Add | Op::Sub | Op::Mul) {
        Ok(Value::Int(result as i64))
    } else {
        Ok(Value::Real(result))
    }
}

fn eval_comparison(op: Op, l: Value, r: Value) -> ConcolicResult<Value> {
    use std::cmp::Ordering;

    let ordering = match (&l, &r) {
        (Value::Str(a), Value::Str(b)) => a.cmp(b),
        _ => {
            let (lf, rf) = (
                l.as_f64().ok_or_else(|| ConcolicError::sort_mismatch("cannot compare these values".into()))?,
                r.as_f64().ok_or_else(|| ConcolicError::sort_mismatch("cannot compare these values".into()))?,
            );
            lf.partial_cmp(&rf).unwrap_or(Ordering::Greater)
        }
    };

    Ok(Value::Bool(match op {
        Op::Eq => ordering == Ordering::Equal,
        Op::Ne => ordering != Ordering::Equal,
        Op::Lt => ordering == Ordering::Less,
        Op::Le => ordering != Ordering::Greater,
        Op::Gt => ordering == Ordering::Greater,
        Op::Ge => ordering != Ordering::Less,
        _ => unreachable!(),
    }))
}
