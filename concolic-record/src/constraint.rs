//! The constraint record (§3 Data Model) and the three-way compare
//! sign tracking it needs to support suffix negation later.

use concolic_expr::{Expr, Op};

/// The comparison kind carried by a raw event, before it is turned
/// into an `Expr`. Covers branch comparisons, the three-way numeric
/// compares (`lcmp`/`fcmpl`/`fcmpg`/`dcmpl`/`dcmpg`), and reference
/// identity tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareKind {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Lcmp,
    Fcmpl,
    Fcmpg,
    Dcmpl,
    Dcmpg,
    AcmpEq,
    AcmpNe,
}

impl CompareKind {
    /// The binary comparison operator this kind corresponds to, for
    /// the branch/identity kinds that map directly onto `Op`.
    pub fn as_op(self) -> Option<Op> {
        match self {
            CompareKind::Eq | CompareKind::AcmpEq => Some(Op::Eq),
            CompareKind::Ne | CompareKind::AcmpNe => Some(Op::Ne),
            CompareKind::Lt => Some(Op::Lt),
            CompareKind::Le => Some(Op::Le),
            CompareKind::Gt => Some(Op::Gt),
            CompareKind::Ge => Some(Op::Ge),
            _ => None,
        }
    }

    pub fn is_three_way(self) -> bool {
        matches!(
            self,
            CompareKind::Lcmp | CompareKind::Fcmpl | CompareKind::Fcmpg | CompareKind::Dcmpl | CompareKind::Dcmpg
        )
    }
}

/// The sign bucket of a three-way compare's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Neg,
    Zero,
    Pos,
}

impl Sign {
    pub const ALL: [Sign; 3] = [Sign::Neg, Sign::Zero, Sign::Pos];

    /// The sign of `a - b`'s mathematical sign, given the three-way
    /// compare's NaN rule: `fcmpl`/`dcmpl` treat NaN as `Neg`,
    /// `fcmpg`/`dcmpg` treat it as `Pos` (§4.4).
    pub fn of_f64(diff: f64, kind: CompareKind) -> Sign {
        if diff.is_nan() {
            return match kind {
                CompareKind::Fcmpl | CompareKind::Dcmpl => Sign::Neg,
                CompareKind::Fcmpg | CompareKind::Dcmpg => Sign::Pos,
                _ => unreachable!("of_f64 only called for three-way float/double kinds"),
            };
        }
        Self::of_ordering(diff.partial_cmp(&0.0).expect("non-NaN diff always orders"))
    }

    pub fn of_i64(diff: i64) -> Sign {
        Self::of_ordering(diff.cmp(&0))
    }

    fn of_ordering(ordering: std::cmp::Ordering) -> Sign {
        match ordering {
            std::cmp::Ordering::Less => Sign::Neg,
            std::cmp::Ordering::Equal => Sign::Zero,
            std::cmp::Ordering::Greater => Sign::Pos,
        }
    }
}

/// A single recorded constraint, immutable once appended.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// A branch/identity comparison: the observed boolean fact.
    Boolean { expr: Expr, timestamp: u64 },
    /// A three-way numeric compare: the two operand expressions and
    /// which sign bucket was observed. Negation enumerates the other
    /// two buckets as separate candidates (§4.4, §9).
    ThreeWay { a: Expr, b: Expr, observed: Sign, timestamp: u64 },
}

impl Constraint {
    pub fn timestamp(&self) -> u64 {
        match self {
            Constraint::Boolean { timestamp, .. } => *timestamp,
            Constraint::ThreeWay { timestamp, .. } => *timestamp,
        }
    }

    /// The boolean expression matching what was actually observed.
    pub fn observed_expr(&self) -> Expr {
        match self {
            Constraint::Boolean { expr, .. } => expr.clone(),
            Constraint::ThreeWay { a, b, observed, .. } => Self::sign_expr(a, b, *observed),
        }
    }

    /// The candidate formulas for negating this entry. A boolean
    /// constraint has exactly one (its logical complement); a
    /// three-way constraint has exactly two (the sign buckets that
    /// were not observed).
    pub fn negation_candidates(&self) -> Vec<Expr> {
        match self {
            Constraint::Boolean { expr, .. } => vec![concolic_expr::negate(expr)],
            Constraint::ThreeWay { a, b, observed, .. } => Sign::ALL
                .iter()
                .filter(|sign| *sign != observed)
                .map(|sign| Self::sign_expr(a, b, *sign))
                .collect(),
        }
    }

    fn sign_expr(a: &Expr, b: &Expr, sign: Sign) -> Expr {
        let op = match sign {
            Sign::Neg => Op::Lt,
            Sign::Zero => Op::Eq,
            Sign::Pos => Op::Gt,
        };
        Expr::binary(op, a.clone(), b.clone())
            .expect("three-way operand expressions share a numeric sort by construction")
    }

    pub fn print(&self) -> String {
        self.observed_expr().print()
    }
}
