//! Self-play game generation CLI.
//!
//! Plays backgammon games between two evaluators and outputs game records
//! as JSONL.
//!
//! Usage:
//!   cargo run --release --bin selfplay -- [OPTIONS]
//!
//! Options:
//!   --games N          Number of games to play (default: 10)
//!   --max-turns N      Turn cap per game (default: 10000)
//!   --policy P         naive | reverse-white | reverse-black | reverse-average
//!   --epsilon E        Random action probability (default: 0.0)
//!   --threads N        Number of parallel threads (default: 1)
//!   --seed N           Random seed, 0 for entropy (default: 0)
//!   --model FILE       ONNX value model for White (and Black unless --model-black)
//!   --model-black FILE ONNX value model for Black
//!   --output FILE      Output file path (default: stdout)
//!   --positions        Record every turn in the output
//!   --quiet            Suppress progress and summary output

use std::env;
use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufWriter};
use std::process;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use gammon::eval::{Evaluator, NeuralEvaluator, PipCountEvaluator};
use gammon::selfplay::{self, Players, SelfPlayConfig};

/// Returns the value following the flag at `args[*i]`, advancing `i`.
fn flag_value<'a>(args: &'a [String], i: &mut usize) -> &'a str {
    let flag = &args[*i];
    *i += 1;
    match args.get(*i) {
        Some(v) => v,
        None => {
            eprintln!("Missing value for {}", flag);
            print_usage();
            process::exit(1);
        }
    }
}

/// Parses the value following the flag at `args[*i]`, exiting on failure.
fn parse_flag<T>(args: &[String], i: &mut usize) -> T
where
    T: FromStr,
    T::Err: Display,
{
    let flag = args[*i].clone();
    let raw = flag_value(args, i);
    match raw.parse() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Invalid {} value '{}': {}", flag, raw, e);
            print_usage();
            process::exit(1);
        }
    }
}

fn load_evaluator(path: Option<&str>) -> Arc<dyn Evaluator> {
    match path {
        Some(p) => Arc::new(NeuralEvaluator::new(Some(p))),
        None => Arc::new(PipCountEvaluator::default()),
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut config = SelfPlayConfig::default();
    let mut output_path: Option<String> = None;
    let mut model: Option<String> = None;
    let mut model_black: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--games" => config.num_games = parse_flag(&args, &mut i),
            "--max-turns" => config.max_turns = parse_flag(&args, &mut i),
            "--policy" => config.policy = parse_flag(&args, &mut i),
            "--epsilon" => {
                config.epsilon = parse_flag(&args, &mut i);
                if !(0.0..=1.0).contains(&config.epsilon) {
                    eprintln!("--epsilon must be within [0, 1]");
                    process::exit(1);
                }
            }
            "--threads" => config.threads = parse_flag(&args, &mut i),
            "--seed" => config.seed = parse_flag(&args, &mut i),
            "--model" => model = Some(flag_value(&args, &mut i).to_string()),
            "--model-black" => model_black = Some(flag_value(&args, &mut i).to_string()),
            "--output" => output_path = Some(flag_value(&args, &mut i).to_string()),
            "--positions" => config.record_positions = true,
            "--quiet" => config.quiet = true,
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let white = load_evaluator(model.as_deref());
    let black = match model_black.as_deref() {
        Some(p) => load_evaluator(Some(p)),
        None => Arc::clone(&white),
    };
    let players = Players { white, black };

    if !config.quiet {
        eprintln!(
            "Self-play: {} games, max {} turns, policy {}, epsilon {:.2}, {} threads",
            config.num_games, config.max_turns, config.policy, config.epsilon, config.threads
        );
    }

    let start = Instant::now();
    let games = selfplay::run_self_play(&config, &players);
    let elapsed = start.elapsed();

    if !config.quiet {
        eprintln!(
            "Completed {} games in {:.1}s ({:.1} games/hour)",
            games.len(),
            elapsed.as_secs_f64(),
            games.len() as f64 / elapsed.as_secs_f64().max(1e-9) * 3600.0
        );
        selfplay::print_summary(&games);
    }

    let written = match output_path {
        Some(ref path) => File::create(path)
            .and_then(|file| selfplay::write_jsonl(&games, &mut BufWriter::new(file))),
        None => {
            let stdout = io::stdout();
            selfplay::write_jsonl(&games, &mut BufWriter::new(stdout.lock()))
        }
    };
    match (written, output_path) {
        (Err(e), _) => {
            eprintln!("Failed to write output: {}", e);
            process::exit(1);
        }
        (Ok(()), Some(path)) if !config.quiet => {
            eprintln!("Wrote {} games to {}", games.len(), path);
        }
        _ => {}
    }
}

fn print_usage() {
    eprintln!("Usage: selfplay [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --games N          Number of games to play (default: 10)");
    eprintln!("  --max-turns N      Turn cap per game (default: 10000)");
    eprintln!("  --policy P         naive | reverse-white | reverse-black | reverse-average");
    eprintln!("  --epsilon E        Random action probability (default: 0.0)");
    eprintln!("  --threads N        Number of parallel threads (default: 1)");
    eprintln!("  --seed N           Random seed, 0 for entropy (default: 0)");
    eprintln!("  --model FILE       ONNX value model (default: pip-count heuristic)");
    eprintln!("  --model-black FILE ONNX value model for Black (default: same as --model)");
    eprintln!("  --output FILE      Output file path (default: stdout)");
    eprintln!("  --positions        Record every turn in the output");
    eprintln!("  --quiet            Suppress progress and summary output");
    eprintln!("  --help             Show this help");
}
