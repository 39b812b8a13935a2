//! The Path Explorer (C7): the fixpoint loop of §4.7.

use crate::cancel::CancelToken;
use crate::options::{ExplorerOptions, MAX_FRESH_VALUE_RETRIES};
use crate::pathrecord::PathRecord;
use crate::termination::TerminationReason;
use concolic_common::{ConcolicError, ConcolicResult, Sort};
use concolic_expr::eval::{Assignment, Value};
use concolic_expr::{Expr, Op};
use concolic_record::{Constraint, PathCondition};
use concolic_solver::{Solution, Solve};
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use std::time::Instant;

/// Everything `explore` produced before it stopped (§6's output format).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExploreOutcome {
    pub paths: Vec<PathRecord>,
    pub iterations: u32,
    pub terminated_reason: TerminationReason,
}

/// The two error kinds the Explorer is allowed to propagate (§7).
#[derive(Debug)]
pub enum ExploreError {
    InvalidConfig(ConcolicError),
    HostFailure { error: ConcolicError, partial: Vec<PathRecord> },
}

/// Runs the fixpoint loop: execute the host, collect its path
/// condition, enumerate suffix negations, solve, dedupe, and repeat
/// until the work queue is dry, `max_iterations` is hit, or `cancel`
/// is set.
pub fn explore<S, F>(
    initial_seeds: Assignment,
    mut execute: F,
    options: &ExplorerOptions<S>,
    cancel: &CancelToken,
) -> Result<ExploreOutcome, ExploreError>
where
    S: Solve,
    F: FnMut(&Assignment) -> ConcolicResult<PathCondition>,
{
    if options.max_iterations == 0 {
        return Err(ExploreError::InvalidConfig(ConcolicError::invalid_config(
            "max_iterations must be at least 1",
        )));
    }

    let mut seeds = initial_seeds;
    let mut seen_fingerprints: HashSet<u64> = HashSet::new();
    let mut tried_seed_keys: HashSet<Vec<(String, String)>> = HashSet::new();
    let mut work_queue: VecDeque<Expr> = VecDeque::new();
    let mut paths = Vec::new();
    let mut iterations = 0u32;

    tried_seed_keys.insert(seed_key(&seeds));

    loop {
        if cancel.is_cancelled() {
            return Ok(ExploreOutcome { paths, iterations, terminated_reason: TerminationReason::Cancelled });
        }
        if iterations >= options.max_iterations {
            return Ok(ExploreOutcome { paths, iterations, terminated_reason: TerminationReason::MaxIterations });
        }
        iterations += 1;
        log::debug!("iteration {iterations}/{}: {} candidates queued", options.max_iterations, work_queue.len());

        let start = Instant::now();
        let pc = execute(&seeds)
            .map_err(|error| ExploreError::HostFailure { error, partial: paths.clone() })?;
        let duration_ns = start.elapsed().as_nanos() as u64;

        // An empty PC (e.g. a switch's unrecorded default arm, §9) carries
        // nothing to branch on; it is not worth a path record or a
        // fingerprint entry.
        if !pc.is_empty() {
            let fingerprint = pc.fingerprint();
            if seen_fingerprints.insert(fingerprint) {
                let entries: Vec<Constraint> = pc.iter().cloned().collect();
                let constraints = entries.iter().map(Constraint::print).collect();
                log::debug!("new path ({} constraints) recorded after {duration_ns}ns", entries.len());
                paths.push(PathRecord::new(seeds.clone(), constraints, duration_ns));
                enqueue_suffix_negations(&entries, &mut work_queue);
            } else {
                log::debug!("path with fingerprint {fingerprint:x} already seen, discarding");
            }
        }

        match next_viable_assignment(&mut work_queue, &options.solver, &mut tried_seed_keys, &seeds) {
            Some(next_seeds) => seeds = next_seeds,
            None => {
                return Ok(ExploreOutcome { paths, iterations, terminated_reason: TerminationReason::Exhausted })
            }
        }
    }
}

/// For each suffix position, deepest first, push `prefix ∧
/// ¬candidate` for every negation candidate of the entry at that
/// position (§4.7 step 3).
fn enqueue_suffix_negations(entries: &[Constraint], work_queue: &mut VecDeque<Expr>) {
    for i in (0..entries.len()).rev() {
        let prefix = prefix_conjunction(&entries[..i]);
        for candidate in entries[i].negation_candidates() {
            let formula = Expr::binary(Op::And, prefix.clone(), candidate)
                .expect("prefix and negation candidate are both boolean-sorted");
            work_queue.push_back(formula);
        }
    }
}

fn prefix_conjunction(entries: &[Constraint]) -> Expr {
    let mut iter = entries.iter().map(Constraint::observed_expr);
    let Some(first) = iter.next() else { return Expr::truth() };
    iter.fold(first, |acc, next| {
        Expr::binary(Op::And, acc, next).expect("observed facts are always boolean-sorted")
    })
}

/// Pops candidates until one solves to an assignment not previously
/// tried (after the retry-with-disequality dance), or the queue dries
/// up (§4.7 step 4, §4.7's "Deduplication of solutions").
fn next_viable_assignment<S: Solve>(
    work_queue: &mut VecDeque<Expr>,
    solver: &S,
    tried: &mut HashSet<Vec<(String, String)>>,
    current_seeds: &Assignment,
) -> Option<Assignment> {
    while let Some(candidate) = work_queue.pop_front() {
        if let Some(merged) = resolve_fresh_seeds(candidate, solver, current_seeds, tried) {
            tried.insert(seed_key(&merged));
            return Some(merged);
        }
    }
    None
}

fn resolve_fresh_seeds<S: Solve>(
    mut candidate: Expr,
    solver: &S,
    current_seeds: &Assignment,
    tried: &HashSet<Vec<(String, String)>>,
) -> Option<Assignment> {
    for _ in 0..=MAX_FRESH_VALUE_RETRIES {
        let solved = match solver.solve(&candidate) {
            Solution::Sat(assignment) => assignment,
            Solution::Unsat | Solution::Unsupported => return None,
        };

        let mut merged = current_seeds.clone();
        for (name, value) in &solved {
            merged.insert(name.clone(), value.clone());
        }
        if !tried.contains(&seed_key(&merged)) {
            return Some(merged);
        }

        for (name, value) in &solved {
            if let Value::Int(v) = value {
                let ne_atom = Expr::binary(Op::Ne, Expr::var(name.clone(), Sort::Int), Expr::int(*v))
                    .expect("NE of an Int var against an Int const is always well-sorted");
                candidate = Expr::binary(Op::And, candidate, ne_atom)
                    .expect("AND of two boolean expressions is always well-sorted");
            }
        }
    }
    None
}

/// A stable, order-independent key for a full seed assignment, used
/// to detect "this exact assignment was tried before".
fn seed_key(seeds: &Assignment) -> Vec<(String, String)> {
    let mut key: Vec<(String, String)> =
        seeds.iter().map(|(name, value)| (name.clone(), format!("{value:?}"))).collect();
    key.sort();
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use concolic_common::Sort;
    use concolic_solver::BoundedLinearSolver;

    fn assignment(pairs: &[(&str, i64)]) -> Assignment {
        pairs.iter().map(|(n, v)| (n.to_string(), Value::Int(*v))).collect()
    }

    #[test]
    fn single_branch_yields_both_sides() {
        let options = ExplorerOptions::new(10, BoundedLinearSolver::default());
        let cancel = CancelToken::new();

        let outcome = explore(
            assignment(&[("x", 5)]),
            |seeds| {
                let Value::Int(x) = seeds["x"] else { unreachable!() };
                let mut pc = PathCondition::new();
                let expr = if x > 10 {
                    Expr::binary(Op::Gt, Expr::var("x", Sort::Int), Expr::int(10)).unwrap()
                } else {
                    Expr::binary(Op::Le, Expr::var("x", Sort::Int), Expr::int(10)).unwrap()
                };
                pc.append(Constraint::Boolean { expr, timestamp: 0 });
                Ok(pc)
            },
            &options,
            &cancel,
        )
        .unwrap();

        assert_eq!(outcome.terminated_reason, TerminationReason::Exhausted);
        assert_eq!(outcome.paths.len(), 2);
    }

    #[test]
    fn host_failure_surfaces_with_partial_paths() {
        let options = ExplorerOptions::new(10, BoundedLinearSolver::default());
        let cancel = CancelToken::new();
        let mut calls = 0;

        let result = explore(
            assignment(&[("x", 5)]),
            |_seeds| {
                calls += 1;
                if calls == 1 {
                    let mut pc = PathCondition::new();
                    pc.append(Constraint::Boolean {
                        expr: Expr::binary(Op::Gt, Expr::var("x", Sort::Int), Expr::int(0)).unwrap(),
                        timestamp: 0,
                    });
                    Ok(pc)
                } else {
                    Err(ConcolicError::host_failure("simulated host crash"))
                }
            },
            &options,
            &cancel,
        );

        match result {
            Err(ExploreError::HostFailure { partial, .. }) => assert_eq!(partial.len(), 1),
            other => panic!("expected HostFailure, got {other:?}"),
        }
    }

    #[test]
    fn zero_max_iterations_is_an_invalid_config() {
        let options = ExplorerOptions::new(0, BoundedLinearSolver::default());
        let cancel = CancelToken::new();
        let result = explore(assignment(&[("x", 0)]), |_| Ok(PathCondition::new()), &options, &cancel);
        assert!(matches!(result, Err(ExploreError::InvalidConfig(_))));
    }

    #[test]
    fn a_cancelled_token_stops_before_the_next_execution() {
        let options = ExplorerOptions::new(10, BoundedLinearSolver::default());
        let cancel = CancelToken::new();
        cancel.cancel();

        let outcome =
            explore(assignment(&[("x", 0)]), |_| Ok(PathCondition::new()), &options, &cancel).unwrap();
        assert_eq!(outcome.terminated_reason, TerminationReason::Cancelled);
        assert_eq!(outcome.iterations, 0);
    }
}
