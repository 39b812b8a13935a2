//! The path condition buffer (C3): an ordered, per-execution
//! conjunction of recorded constraints.

use crate::constraint::Constraint;
use concolic_expr::{Expr, Op};
use std::hash::{Hash, Hasher};

/// Ordered sequence of constraints observed by one execution. The
/// i-th prefix is the decision context after i comparisons.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathCondition {
    entries: Vec<Constraint>,
}

impl PathCondition {
    pub fn new() -> Self {
        Self::default()
    }

    /// O(1) append, called only by the Recorder.
    pub fn append(&mut self, constraint: Constraint) {
        self.entries.push(constraint);
    }

    /// A shallow copy suitable for the Explorer to retain past the
    /// lifetime of the buffer it was taken from.
    pub fn snapshot(&self) -> PathCondition {
        self.clone()
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Constraint> {
        self.entries.get(index)
    }

    /// `TRUE` on an empty buffer, otherwise a left-associated `AND` of
    /// every entry's observed fact.
    pub fn as_conjunction(&self) -> Expr {
        let mut iter = self.entries.iter().map(Constraint::observed_expr);
        let Some(first) = iter.next() else {
            return Expr::truth();
        };
        iter.fold(first, |acc, next| {
            Expr::binary(Op::And, acc, next).expect("observed facts are always boolean-sorted")
        })
    }

    /// Stable, order-preserving fingerprint of the printed form of
    /// every entry, used by the Explorer to dedupe path conditions
    /// (§4.7's "seen" set).
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        for constraint in &self.entries {
            constraint.print().hash(&mut hasher);
            0xFFu8.hash(&mut hasher); // entry separator, avoids "ab","c" == "a","bc"
        }
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concolic_common::Sort;
    use concolic_expr::Expr;

    fn gt_x(k: i64) -> Constraint {
        Constraint::Boolean {
            expr: Expr::binary(Op::Gt, Expr::var("x", Sort::Int), Expr::int(k)).unwrap(),
            timestamp: 0,
        }
    }

    #[test]
    fn empty_buffer_conjunction_is_truth() {
        let pc = PathCondition::new();
        assert_eq!(pc.as_conjunction(), Expr::truth());
    }

    #[test]
    fn reset_then_append_then_snapshot_round_trips() {
        let mut pc = PathCondition::new();
        pc.append(gt_x(0));
        let snap = pc.snapshot();
        assert_eq!(snap.len(), 1);

        pc.reset();
        assert!(pc.is_empty());
        assert_eq!(snap.len(), 1, "snapshot is unaffected by later resets");
    }

    #[test]
    fn fingerprint_is_order_sensitive() {
        let mut a = PathCondition::new();
        a.append(gt_x(0));
        a.append(gt_x(1));

        let mut b = PathCondition::new();
        b.append(gt_x(1));
        b.append(gt_x(0));

        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn fingerprint_is_stable_for_equal_conditions() {
        let mut a = PathCondition::new();
        a.append(gt_x(5));
        let mut b = PathCondition::new();
        b.append(gt_x(5));
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn conjunction_is_left_associated() {
        let mut pc = PathCondition::new();
        pc.append(gt_x(0));
        pc.append(gt_x(1));
        pc.append(gt_x(2));
        assert_eq!(pc.as_conjunction().print(), "(((x > 0) && (x > 1)) && (x > 2))");
    }
}
