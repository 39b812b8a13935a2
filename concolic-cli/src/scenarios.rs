//! Built-in demo hosts for the `explore` subcommand.
//!
//! The core engine is deliberately host-agnostic (§1 "out of scope:
//! instrumentation of a host runtime"), so this front-end ships the
//! same fixed host programs the engine's own integration tests drive,
//! named after the concrete scenarios of §8.

use concolic_common::{ConcolicResult, Sort};
use concolic_expr::eval::{Assignment, Value};
use concolic_record::{recorder, CompareKind, Operand, PathCondition, RecorderConfig, Session};

pub struct Scenario {
    pub name: &'static str,
    pub about: &'static str,
    pub initial_seeds: fn() -> Assignment,
    pub execute: fn(&Assignment, RecorderConfig) -> ConcolicResult<PathCondition>,
}

fn seeded(pairs: &[(&str, i64)]) -> Assignment {
    pairs.iter().map(|(n, v)| (n.to_string(), Value::Int(*v))).collect()
}

fn five_case_select_seeds() -> Assignment {
    seeded(&[("choice", 0)])
}

fn execute_five_case_select(seeds: &Assignment, config: RecorderConfig) -> ConcolicResult<PathCondition> {
    let session = Session::new(config);
    session.make_symbolic_int("choice")?;

    let Value::Int(choice) = seeds["choice"] else { unreachable!("choice is always an int") };
    let operand = Operand::symbolic("choice", Sort::Int, Value::Int(choice));
    let selected = if (0..5).contains(&choice) { choice } else { -1 };
    recorder::switch_case(&session, operand, selected);
    Ok(session.snapshot())
}

fn single_branch_seeds() -> Assignment {
    seeded(&[("x", 5)])
}

fn execute_single_branch(seeds: &Assignment, config: RecorderConfig) -> ConcolicResult<PathCondition> {
    let session = Session::new(config);
    session.make_symbolic_int("x")?;

    let Value::Int(x) = seeds["x"] else { unreachable!("x is always an int") };
    let operand = Operand::symbolic("x", Sort::Int, Value::Int(x));
    recorder::branch(&session, operand, CompareKind::Gt, x > 10);
    Ok(session.snapshot())
}

fn conjunction_seeds() -> Assignment {
    seeded(&[("x", 0)])
}

fn execute_conjunction(seeds: &Assignment, config: RecorderConfig) -> ConcolicResult<PathCondition> {
    let session = Session::new(config);
    session.make_symbolic_int("x")?;

    let Value::Int(x) = seeds["x"] else { unreachable!("x is always an int") };
    let first = Operand::symbolic("x", Sort::Int, Value::Int(x));
    recorder::branch(&session, first, CompareKind::Ge, x >= 0);
    let second = Operand::symbolic("x", Sort::Int, Value::Int(x));
    recorder::branch(&session, second, CompareKind::Lt, x < 100);
    Ok(session.snapshot())
}

pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "five-case-select",
        about: "a five-armed switch over `choice`, seeded at 0",
        initial_seeds: five_case_select_seeds,
        execute: execute_five_case_select,
    },
    Scenario {
        name: "single-branch",
        about: "one `x > 10` branch, seeded at 5",
        initial_seeds: single_branch_seeds,
        execute: execute_single_branch,
    },
    Scenario {
        name: "conjunction",
        about: "`x >= 0` then `x < 100`, seeded at 0",
        initial_seeds: conjunction_seeds,
        execute: execute_conjunction,
    },
];

pub fn find(name: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.name == name)
}
