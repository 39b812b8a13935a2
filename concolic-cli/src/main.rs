//! Command-line front-end for the concolic path exploration engine.
//!
//! Drives one of the built-in demo hosts (§8's concrete scenarios)
//! through `concolic_explorer::explore` and prints the §6 JSON output
//! format to stdout.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use concolic_cli::scenarios;
use concolic_record::RecorderConfig;

/// The concolic path exploration engine
#[derive(Parser)]
#[command(name = "concolic")]
#[command(about = "A concolic (concrete + symbolic) path exploration engine")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all logging below errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the Explorer's fixpoint loop against a built-in demo host
    Explore {
        /// Which built-in host to run
        #[arg(default_value = "five-case-select")]
        scenario: String,

        /// Emit a log::debug! line per recorded event (pair with -v to see them)
        #[arg(long)]
        debug: bool,

        /// Master gate for the Recorder; false makes it a no-op
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        interception_enabled: bool,

        /// Reentrancy bound for the Recorder
        #[arg(long, default_value_t = 10)]
        max_recursion_depth: u32,

        /// Explorer termination bound
        #[arg(long, default_value_t = 100)]
        max_iterations: u32,

        /// Solver scan window
        #[arg(long, default_value_t = 1000)]
        search_width: u32,
    },

    /// List the built-in demo hosts
    Scenarios,
}

fn main() {
    match try_main() {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(error) => {
            eprintln!("error: {error:#}");
            std::process::exit(1);
        }
    }
}

fn try_main() -> Result<i32> {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        log::LevelFilter::Error
    } else {
        match cli.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    match cli.command {
        Commands::Explore {
            scenario,
            debug,
            interception_enabled,
            max_recursion_depth,
            max_iterations,
            search_width,
        } => {
            let config = RecorderConfig { debug, interception_enabled, max_recursion_depth };
            run_and_print(&scenario, config, max_iterations, search_width)
        }
        Commands::Scenarios => {
            for scenario in scenarios::SCENARIOS {
                println!("{:<18} {}", scenario.name, scenario.about);
            }
            Ok(0)
        }
    }
}

/// Runs one scenario, prints the §6 JSON summary (or an error plus any
/// partial path records) and returns the process exit code (§6's
/// "Exit codes of any front-end driver").
fn run_and_print(scenario: &str, config: RecorderConfig, max_iterations: u32, search_width: u32) -> Result<i32> {
    match concolic_cli::run_scenario(scenario, config, max_iterations, search_width) {
        Ok(outcome) => {
            let json = serde_json::to_string_pretty(&outcome)
                .context("serializing the exploration outcome")?;
            println!("{json}");
            Ok(0)
        }
        Err(error) => {
            eprintln!("error: {error}");
            if let Some(partial) = error.partial() {
                if let Ok(json) = serde_json::to_string_pretty(partial) {
                    eprintln!("{json}");
                }
            }
            Ok(error.exit_code())
        }
    }
}
