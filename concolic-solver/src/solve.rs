//! The bounded linear solver (C6): normalizes atoms, folds them into
//! per-variable bounds, and descends `OR` by disjunctive enumeration.

use crate::bounds::VarBounds;
use crate::solution::Solution;
use concolic_common::Sort;
use concolic_expr::eval::Value;
use concolic_expr::{Expr, Op};
use hashbrown::HashMap;

/// Pluggable solving capability (§4.6's "plug-in interface"); an
/// external solver may be substituted as long as it honors the same
/// `Expr -> Solution` contract.
pub trait Solve {
    fn solve(&self, expr: &Expr) -> Solution;
}

/// The shipped solver: bounded scan over per-variable integer bounds,
/// with disjunctive enumeration over `OR`.
#[derive(Debug, Clone, Copy)]
pub struct BoundedLinearSolver {
    pub search_width: u32,
}

impl Default for BoundedLinearSolver {
    fn default() -> Self {
        Self { search_width: 1000 }
    }
}

impl Solve for BoundedLinearSolver {
    fn solve(&self, expr: &Expr) -> Solution {
        let mut any_unsupported = false;
        for branch in disjuncts(expr) {
            match solve_conjunction(&branch, self.search_width) {
                Solution::Sat(assignment) => return Solution::Sat(assignment),
                Solution::Unsupported => any_unsupported = true,
                Solution::Unsat => {}
            }
        }
        if any_unsupported {
            Solution::Unsupported
        } else {
            Solution::Unsat
        }
    }
}

/// Expands `expr` into disjunctive-normal-form branches: each branch
/// is a flat list of leaf expressions whose conjunction is one
/// disjunct of the original formula. `AND` distributes, `OR` concats.
fn disjuncts(expr: &Expr) -> Vec<Vec<Expr>> {
    match expr {
        Expr::Binary(Op::Or, l, r) => {
            let mut branches = disjuncts(l);
            branches.extend(disjuncts(r));
            branches
        }
        Expr::Binary(Op::And, l, r) => {
            let mut merged = Vec::new();
            for left_branch in disjuncts(l) {
                for right_branch in disjuncts(r) {
                    let mut combined = left_branch.clone();
                    combined.extend(right_branch);
                    merged.push(combined);
                }
            }
            merged
        }
        other => vec![vec![other.clone()]],
    }
}

/// Normalize one leaf to `(variable name, op, constant)` with the
/// variable on the left, flipping a directional comparison when the
/// host wrote the constant first (§4.6 step 1).
fn normalize(expr: &Expr) -> Option<(String, Op, i64)> {
    let Expr::Binary(op, l, r) = expr else { return None };
    if !op.is_comparison() {
        return None;
    }
    match (l.as_ref(), r.as_ref()) {
        (Expr::Var(name, Sort::Int), Expr::IntConst(k)) => Some((name.clone(), *op, *k)),
        (Expr::IntConst(k), Expr::Var(name, Sort::Int)) => Some((name.clone(), op.flip(), *k)),
        _ => None,
    }
}

fn solve_conjunction(atoms: &[Expr], search_width: u32) -> Solution {
    let mut per_var: HashMap<String, VarBounds> = HashMap::new();
    let mut unsupported = false;

    for atom in atoms {
        // A fully concrete atom (no free variable) contributes no
        // bound either way; fold it now instead of treating it as an
        // unsupported shape. `Expr::truth()` relies on this.
        if let Ok(Value::Bool(b)) = concolic_expr::eval::evaluate(atom, &concolic_expr::eval::Assignment::new()) {
            if !b {
                return Solution::Unsat;
            }
            continue;
        }

        let Some((name, op, k)) = normalize(atom) else {
            unsupported = true;
            continue;
        };
        let bounds = per_var.entry(name).or_default();
        let conflict = match op {
            Op::Eq => bounds.eq(k).is_err(),
            Op::Ne => {
                bounds.ne(k);
                false
            }
            Op::Lt => {
                bounds.lt(k);
                false
            }
            Op::Le => {
                bounds.le(k);
                false
            }
            Op::Gt => {
                bounds.gt(k);
                false
            }
            Op::Ge => {
                bounds.ge(k);
                false
            }
            _ => unreachable!("normalize only emits comparison ops"),
        };
        if conflict {
            return Solution::Unsat;
        }
    }

    let mut assignment = HashMap::new();
    for (name, bounds) in &per_var {
        match bounds.resolve(search_width) {
            Some(value) => {
                assignment.insert(name.clone(), Value::Int(value));
            }
            None => return Solution::Unsat,
        }
    }

    if unsupported {
        Solution::Unsupported
    } else {
        Solution::Sat(assignment)
    }
}
