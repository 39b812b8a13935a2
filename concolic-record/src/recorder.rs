//! The Recorder (C4): one entry point per event class, each sharing
//! the reentrancy guard, shutdown gate, relevance filter, and
//! degrade-to-concrete failure discipline of §4.4.

use crate::constraint::{CompareKind, Constraint, Sign};
use crate::operand::Operand;
use crate::session::Session;
use concolic_common::ConcolicError;
use concolic_expr::Expr;

/// Releases the thread's reentrancy depth on every exit path,
/// including an unwind out of a host comparison (§5's "guaranteed
/// decrement on all exit paths").
struct DepthGuard<'a> {
    session: &'a Session,
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.session.with_thread_state(|state| state.depth -= 1);
    }
}

/// Acquires the reentrancy slot for this call, or `None` if the
/// session is shutting down, interception is disabled, or the depth
/// bound is exceeded (emitting a one-shot diagnostic the first time).
fn enter(session: &Session) -> Option<DepthGuard<'_>> {
    if session.is_shutting_down() {
        return None;
    }
    let config = session.config();
    if !config.interception_enabled {
        return None;
    }
    let acquired = session.with_thread_state(|state| {
        if state.depth >= config.max_recursion_depth {
            if !state.warned_reentrancy {
                log::warn!(
                    "recorder reentrancy bound ({}) exceeded on this thread; degrading to concrete",
                    config.max_recursion_depth
                );
                state.warned_reentrancy = true;
            }
            false
        } else {
            state.depth += 1;
            true
        }
    });
    acquired.then_some(DepthGuard { session })
}

fn relevant(session: &Session, left: &Operand, right: &Operand) -> bool {
    session.labels().is_user_symbolic(left.tag()) || session.labels().is_user_symbolic(right.tag())
}

fn append_boolean(session: &Session, expr: Expr) {
    if session.config().debug {
        log::debug!("recorded: {}", expr.print());
    }
    session.with_thread_state(|state| {
        let timestamp = state.timestamp;
        state.timestamp += 1;
        state.pc.append(Constraint::Boolean { expr, timestamp });
    });
}

fn append_three_way(session: &Session, a: Expr, b: Expr, observed: Sign) {
    if session.config().debug {
        log::debug!("recorded: three-way compare of {} and {} observed {observed:?}", a.print(), b.print());
    }
    session.with_thread_state(|state| {
        let timestamp = state.timestamp;
        state.timestamp += 1;
        state.pc.append(Constraint::ThreeWay { a, b, observed, timestamp });
    });
}

fn record_binary_branch(session: &Session, left: &Operand, right: &Operand, kind: CompareKind, taken: bool) {
    let result = (|| {
        let op = kind.as_op().ok_or_else(|| {
            ConcolicError::sort_mismatch(format!("{kind:?} has no binary comparison form"))
        })?;
        let op = if taken { op } else { op.complement().unwrap_or(op) };
        Expr::binary(op, left.to_expr(), right.to_expr())
    })();
    match result {
        Ok(expr) => append_boolean(session, expr),
        Err(e) => log::debug!("branch recording skipped: {e}"),
    }
}

/// `icmp_jump`: a two-operand integer branch test.
pub fn icmp_jump(session: &Session, left: Operand, right: Operand, kind: CompareKind, taken: bool) -> bool {
    if let Some(_guard) = enter(session) {
        if relevant(session, &left, &right) {
            record_binary_branch(session, &left, &right, kind, taken);
        }
    }
    taken
}

/// `acmp_jump`: a reference-identity test; only `AcmpEq`/`AcmpNe` are
/// meaningful kinds.
pub fn acmp_jump(session: &Session, left: Operand, right: Operand, kind: CompareKind, taken: bool) -> bool {
    debug_assert!(matches!(kind, CompareKind::AcmpEq | CompareKind::AcmpNe));
    if let Some(_guard) = enter(session) {
        if relevant(session, &left, &right) {
            record_binary_branch(session, &left, &right, kind, taken);
        }
    }
    taken
}

/// `lcmp`: three-way compare of two integer operands.
pub fn lcmp(session: &Session, a: Operand, b: Operand) -> i32 {
    let sign = if let Some(_guard) = enter(session) {
        let diff = match (a.as_i64(), b.as_i64()) {
            (Some(x), Some(y)) => x - y,
            _ => {
                log::debug!("lcmp recording skipped: non-integer operand");
                return sign_of_i64_unrecorded(&a, &b);
            }
        };
        let sign = Sign::of_i64(diff);
        if relevant(session, &a, &b) {
            append_three_way(session, a.to_expr(), b.to_expr(), sign);
        }
        sign
    } else {
        return sign_of_i64_unrecorded(&a, &b);
    };
    sign_to_i32(sign)
}

fn sign_of_i64_unrecorded(a: &Operand, b: &Operand) -> i32 {
    match (a.as_i64(), b.as_i64()) {
        (Some(x), Some(y)) => sign_to_i32(Sign::of_i64(x - y)),
        _ => 0,
    }
}

fn sign_to_i32(sign: Sign) -> i32 {
    match sign {
        Sign::Neg => -1,
        Sign::Zero => 0,
        Sign::Pos => 1,
    }
}

fn three_way_float(session: &Session, a: Operand, b: Operand, kind: CompareKind) -> i32 {
    let diff = match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x - y,
        _ => {
            log::debug!("{kind:?} recording skipped: non-numeric operand");
            return 0;
        }
    };
    let sign = Sign::of_f64(diff, kind);
    if let Some(_guard) = enter(session) {
        if relevant(session, &a, &b) {
            append_three_way(session, a.to_expr(), b.to_expr(), sign);
        }
    }
    sign_to_i32(sign)
}

pub fn fcmpl(session: &Session, a: Operand, b: Operand) -> i32 {
    three_way_float(session, a, b, CompareKind::Fcmpl)
}

pub fn fcmpg(session: &Session, a: Operand, b: Operand) -> i32 {
    three_way_float(session, a, b, CompareKind::Fcmpg)
}

pub fn dcmpl(session: &Session, a: Operand, b: Operand) -> i32 {
    three_way_float(session, a, b, CompareKind::Dcmpl)
}

pub fn dcmpg(session: &Session, a: Operand, b: Operand) -> i32 {
    three_way_float(session, a, b, CompareKind::Dcmpg)
}

/// `branch`: a unary-against-zero test (`IFEQ`/`IFNE`/`IFLT`/`IFGE`/
/// `IFGT`/`IFLE`), expressed via the matching `CompareKind`.
pub fn branch(session: &Session, operand: Operand, kind: CompareKind, taken: bool) -> bool {
    if let Some(_guard) = enter(session) {
        if session.labels().is_user_symbolic(operand.tag()) {
            let result = (|| {
                let op = kind.as_op().ok_or_else(|| {
                    ConcolicError::sort_mismatch(format!("{kind:?} has no binary comparison form"))
                })?;
                let op = if taken { op } else { op.complement().unwrap_or(op) };
                Expr::binary(op, operand.to_expr(), operand.zero_literal())
            })();
            match result {
                Ok(expr) => append_boolean(session, expr),
                Err(e) => log::debug!("branch recording skipped: {e}"),
            }
        }
    }
    taken
}

/// `switch_case`: a multi-way select. `selected_case == -1` denotes
/// the default arm, which records nothing (§9's open question,
/// resolved against materializing the default's conjunction here).
pub fn switch_case(session: &Session, operand: Operand, selected_case: i64) -> i64 {
    if let Some(_guard) = enter(session) {
        if selected_case != -1 && session.labels().is_user_symbolic(operand.tag()) {
            match Expr::binary(concolic_expr::Op::Eq, operand.to_expr(), Expr::int(selected_case)) {
                Ok(expr) => append_boolean(session, expr),
                Err(e) => log::debug!("switch_case recording skipped: {e}"),
            }
        }
    }
    selected_case
}

#[cfg(test)]
mod tests {
    use super::*;
    use concolic_common::Sort;
    use concolic_expr::eval::Value;
    use crate::session::RecorderConfig;

    fn fresh_session() -> Session {
        let session = Session::new(RecorderConfig::default());
        session.make_symbolic_int("x").unwrap();
        session
    }

    #[test]
    fn icmp_jump_records_the_taken_branch() {
        let session = fresh_session();
        let x = Operand::symbolic("x", Sort::Int, Value::Int(5));
        let ten = Operand::concrete(Value::Int(10));
        let taken = icmp_jump(&session, x, ten, CompareKind::Lt, true);
        assert!(taken);

        let pc = session.snapshot();
        assert_eq!(pc.len(), 1);
        assert_eq!(pc.get(0).unwrap().print(), "(x < 10)");
    }

    #[test]
    fn icmp_jump_records_the_complement_when_not_taken() {
        let session = fresh_session();
        let x = Operand::symbolic("x", Sort::Int, Value::Int(15));
        let ten = Operand::concrete(Value::Int(10));
        icmp_jump(&session, x, ten, CompareKind::Lt, false);

        let pc = session.snapshot();
        assert_eq!(pc.get(0).unwrap().print(), "(x >= 10)");
    }

    #[test]
    fn irrelevant_operands_record_nothing() {
        let session = fresh_session();
        let a = Operand::concrete(Value::Int(1));
        let b = Operand::concrete(Value::Int(2));
        icmp_jump(&session, a, b, CompareKind::Lt, true);
        assert!(session.snapshot().is_empty());
    }

    #[test]
    fn lcmp_returns_and_records_the_observed_sign() {
        let session = fresh_session();
        let a = Operand::symbolic("x", Sort::Int, Value::Int(5));
        let b = Operand::concrete(Value::Int(10));
        let result = lcmp(&session, a, b);
        assert_eq!(result, -1);

        let pc = session.snapshot();
        assert_eq!(pc.get(0).unwrap().print(), "(x < 10)");
    }

    #[test]
    fn fcmpl_and_fcmpg_disagree_on_nan() {
        let session = fresh_session();
        let nan_op = || Operand::symbolic("x", Sort::Real, Value::Real(f64::NAN));
        assert_eq!(fcmpl(&session, nan_op(), Operand::concrete(Value::Real(0.0))), -1);
        session.reset_thread_state();
        assert_eq!(fcmpg(&session, nan_op(), Operand::concrete(Value::Real(0.0))), 1);
    }

    #[test]
    fn branch_on_zero_records_against_the_matching_sort() {
        let session = fresh_session();
        let x = Operand::symbolic("x", Sort::Int, Value::Int(-1));
        branch(&session, x, CompareKind::Lt, true);
        assert_eq!(session.snapshot().get(0).unwrap().print(), "(x < 0)");
    }

    #[test]
    fn switch_case_default_arm_records_nothing() {
        let session = fresh_session();
        let choice = Operand::symbolic("choice", Sort::Int, Value::Int(0));
        let result = switch_case(&session, choice, -1);
        assert_eq!(result, -1);
        assert!(session.snapshot().is_empty());
    }

    #[test]
    fn switch_case_non_default_records_equality() {
        let session = fresh_session();
        let choice = Operand::symbolic("choice", Sort::Int, Value::Int(2));
        switch_case(&session, choice, 2);
        assert_eq!(session.snapshot().get(0).unwrap().print(), "(choice == 2)");
    }

    #[test]
    fn reentrancy_beyond_the_bound_is_a_no_op() {
        let config = RecorderConfig { max_recursion_depth: 2, ..RecorderConfig::default() };
        let session = Session::new(config);
        session.make_symbolic_int("x").unwrap();

        session.with_thread_state(|state| state.depth = 2);
        let x = Operand::symbolic("x", Sort::Int, Value::Int(1));
        let ten = Operand::concrete(Value::Int(10));
        let taken = icmp_jump(&session, x, ten, CompareKind::Lt, true);
        assert!(taken, "concrete result still flows through at the bound");
        assert!(session.snapshot().is_empty(), "no recording happens past the bound");
    }

    #[test]
    fn shutdown_disables_all_recording() {
        let session = fresh_session();
        session.shutdown();
        let x = Operand::symbolic("x", Sort::Int, Value::Int(1));
        let ten = Operand::concrete(Value::Int(10));
        icmp_jump(&session, x, ten, CompareKind::Lt, true);
        assert!(session.snapshot().is_empty());
    }

    #[test]
    fn two_sessions_on_the_same_thread_do_not_share_state() {
        let first = fresh_session();
        let second = fresh_session();

        let x = Operand::symbolic("x", Sort::Int, Value::Int(1));
        let ten = Operand::concrete(Value::Int(10));
        icmp_jump(&first, x, ten, CompareKind::Lt, true);

        assert_eq!(first.snapshot().len(), 1);
        assert!(second.snapshot().is_empty(), "a second Session must start with a clean PC buffer");
    }
}
