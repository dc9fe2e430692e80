//! CLI entry point for the cube solver.
//!
//! Usage:
//!   cube-solver solve <CUBE> [options]
//!   cube-solver solve --stdin [options]
//!   cube-solver scramble <MOVES>...
//!   cube-solver check <CUBE>
//!
//! Solve options:
//!   --config <file>         JSON solver configuration
//!   --base-weight <f>       Initial score weight (default: 0.4)
//!   --max-expansions <n>    Give up after expanding n states
//!   --timeout <seconds>     Give up after this long
//!   --json                  Print a JSON document instead of step lines

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

use cube_solver::{
    apply_sequence, parse_sequence, solve, Cube, CubeError, Move, SearchStats, SolveError,
    SolverConfig, Step,
};

#[derive(Parser)]
#[command(name = "cube-solver")]
#[command(about = "Heuristic best-first solver for the 3x3x3 cube")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find a move sequence that solves a cube
    Solve {
        /// 54 digits 0-5, face by face (use --stdin to read from stdin)
        #[arg(value_name = "CUBE")]
        cube: Option<String>,

        /// Read the cube from stdin instead of the command line
        #[arg(long)]
        stdin: bool,

        /// Path to a JSON solver configuration
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Initial weight of the score in the frontier cost
        #[arg(long)]
        base_weight: Option<f64>,

        /// Maximum number of states to expand
        #[arg(long)]
        max_expansions: Option<usize>,

        /// Maximum search time in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Apply moves such as `F R' U` to the solved cube and print the encoding
    Scramble {
        #[arg(value_name = "MOVES", required = true)]
        moves: Vec<String>,
    },
    /// Check that a cube string is well formed and physically possible
    Check {
        #[arg(value_name = "CUBE")]
        cube: String,
    },
}

/// Output format for a solve run
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    solved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    moves: Vec<Move>,
    steps: Vec<Step>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<SearchStats>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .init();

    let outcome = match cli.command {
        Commands::Solve {
            cube,
            stdin,
            config,
            base_weight,
            max_expansions,
            timeout,
            json,
        } => load_config(config, base_weight, max_expansions, timeout).and_then(|config| {
            let input = read_cube_input(cube, stdin)?;
            run_solve(&input, &config, json)
        }),
        Commands::Scramble { moves } => run_scramble(&moves.join(" ")),
        Commands::Check { cube } => run_check(&cube),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(message) => {
            eprintln!("Error: {}", message);
            ExitCode::FAILURE
        }
    }
}

fn load_config(
    path: Option<PathBuf>,
    base_weight: Option<f64>,
    max_expansions: Option<usize>,
    timeout: Option<u64>,
) -> Result<SolverConfig, String> {
    let mut config = match path {
        Some(path) => {
            let text = fs::read_to_string(&path)
                .map_err(|e| format!("Failed to read config {:?}: {}", path, e))?;
            serde_json::from_str(&text)
                .map_err(|e| format!("Failed to parse config {:?}: {}", path, e))?
        }
        None => SolverConfig::default(),
    };

    if let Some(base) = base_weight {
        config.weighting.base = base;
    }
    if max_expansions.is_some() {
        config.max_expansions = max_expansions;
    }
    if let Some(seconds) = timeout {
        config.timeout_ms = Some(seconds.saturating_mul(1000));
    }
    Ok(config)
}

fn read_cube_input(cube: Option<String>, stdin: bool) -> Result<String, String> {
    if stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;
        Ok(buffer.trim().to_string())
    } else if let Some(cube) = cube {
        Ok(cube.trim().to_string())
    } else {
        Err("Must provide either a cube string or --stdin".to_string())
    }
}

fn run_solve(input: &str, config: &SolverConfig, json: bool) -> Result<bool, String> {
    let cube = Cube::parse_valid(input).map_err(|e| e.to_string())?;

    match solve(&cube, config) {
        Ok(solution) => {
            let steps = solution.steps();
            if json {
                print_json(&SolveOutput {
                    solved: true,
                    reason: None,
                    moves: solution.moves.clone(),
                    steps,
                    stats: Some(solution.stats),
                })?;
            } else {
                for step in &steps {
                    println!("step {}: {}|{}", step.step, step.turn, step.cube.encode());
                }
            }
            Ok(true)
        }
        Err(e @ (SolveError::SearchExhausted { .. } | SolveError::BudgetExceeded { .. })) => {
            if json {
                print_json(&SolveOutput {
                    solved: false,
                    reason: Some(e.to_string()),
                    moves: Vec::new(),
                    steps: Vec::new(),
                    stats: None,
                })?;
            } else {
                eprintln!("No solution: {}", e);
            }
            Ok(false)
        }
        Err(e) => Err(e.to_string()),
    }
}

fn print_json(output: &SolveOutput) -> Result<(), String> {
    let text = serde_json::to_string_pretty(output).map_err(|e| e.to_string())?;
    println!("{}", text);
    Ok(())
}

fn run_scramble(moves: &str) -> Result<bool, String> {
    let moves = parse_sequence(moves).map_err(|e| e.to_string())?;
    println!("{}", apply_sequence(&Cube::solved(), &moves).encode());
    Ok(true)
}

fn run_check(input: &str) -> Result<bool, String> {
    let cube = Cube::decode(input.trim()).map_err(|e| e.to_string())?;
    print!("{}", cube);
    match cube.check_valid() {
        Ok(()) => {
            println!("Valid cube");
            Ok(true)
        }
        Err(CubeError::InvalidConfiguration { counts }) => {
            let report: Vec<String> = counts
                .iter()
                .enumerate()
                .filter(|&(_, &count)| count != 9)
                .map(|(color, count)| format!("{}: {}", color, count))
                .collect();
            println!("Invalid cube - {}", report.join(", "));
            Ok(false)
        }
        Err(e) => Err(e.to_string()),
    }
}
