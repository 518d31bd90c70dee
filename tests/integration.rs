//! Integration tests for the selfplay binary.
//!
//! Spawns the binary with various flags and checks the JSONL it writes to
//! stdout and the exit status.

use std::process::{Command, Output, Stdio};

use gammon::board::{Color, NUM_CHECKERS};
use gammon::protocol::parse_board;

/// Runs `selfplay` with `args` and returns its output.
fn run_selfplay(args: &[&str]) -> Output {
    let exe = env!("CARGO_BIN_EXE_selfplay");
    Command::new(exe)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .expect("failed to start selfplay")
}

/// Parses stdout as JSONL.
fn records(output: &Output) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|l| serde_json::from_str(l).expect("each line should be JSON"))
        .collect()
}

#[test]
fn plays_requested_number_of_games() {
    let output = run_selfplay(&["--games", "3", "--seed", "11", "--quiet"]);
    assert!(output.status.success());
    let games = records(&output);
    assert_eq!(games.len(), 3);
    for (i, game) in games.iter().enumerate() {
        assert_eq!(game["game_id"], i);
        let winner = game["winner"].as_str().expect("game should finish");
        let color = if winner == "white" { Color::White } else { Color::Black };
        let board = parse_board(game["final_board"].as_str().unwrap()).unwrap();
        assert_eq!(board.off_count(color), NUM_CHECKERS);
        assert!(game.get("history").is_none());
    }
}

#[test]
fn quiet_suppresses_stderr() {
    let output = run_selfplay(&["--games", "1", "--seed", "2", "--quiet"]);
    assert!(output.status.success());
    assert!(output.stderr.is_empty());
}

#[test]
fn summary_goes_to_stderr() {
    let output = run_selfplay(&["--games", "2", "--seed", "2"]);
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("=== Self-Play Summary ==="));
    assert!(stderr.contains("Game 1/2"));
    assert_eq!(records(&output).len(), 2);
}

#[test]
fn positions_flag_records_history() {
    let output = run_selfplay(&[
        "--games", "1", "--seed", "5", "--positions", "--policy", "reverse-average", "--quiet",
    ]);
    assert!(output.status.success());
    let games = records(&output);
    let history = games[0]["history"].as_array().expect("history should be recorded");
    assert_eq!(history.len() as u64, games[0]["turns"].as_u64().unwrap());
    let first = &history[0];
    assert_eq!(first["board"], "1:B2 6:W5 8:W3 12:B5 13:W5 17:B3 19:B5 24:W2");
    assert_eq!(first["color"], games[0]["first"]);
    assert_eq!(first["dice"].as_array().unwrap().len(), 2);
}

#[test]
fn same_seed_same_games() {
    let args = ["--games", "2", "--seed", "99", "--quiet"];
    let a = run_selfplay(&args);
    let b = run_selfplay(&args);
    assert_eq!(a.stdout, b.stdout);
}

#[test]
fn threads_do_not_change_results() {
    let a = run_selfplay(&["--games", "4", "--seed", "3", "--quiet"]);
    let b = run_selfplay(&["--games", "4", "--seed", "3", "--threads", "2", "--quiet"]);
    assert_eq!(a.stdout, b.stdout);
}

#[test]
fn turn_cap_leaves_games_unfinished() {
    let output = run_selfplay(&["--games", "1", "--seed", "4", "--max-turns", "2", "--quiet"]);
    assert!(output.status.success());
    let games = records(&output);
    assert!(games[0]["winner"].is_null());
    assert_eq!(games[0]["turns"], 2);
}

#[test]
fn missing_model_falls_back() {
    let output = run_selfplay(&[
        "--games", "1", "--seed", "8", "--model", "/nonexistent/model.onnx", "--quiet",
    ]);
    assert!(output.status.success());
    assert_eq!(records(&output).len(), 1);
}

#[test]
fn output_file_is_written() {
    let path = std::env::temp_dir().join(format!("gammon-selfplay-{}.jsonl", std::process::id()));
    let path_str = path.to_str().unwrap();
    let output = run_selfplay(&["--games", "2", "--seed", "6", "--output", path_str, "--quiet"]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 2);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn bad_arguments_exit_with_usage() {
    for args in [
        vec!["--bogus"],
        vec!["--games", "many"],
        vec!["--policy", "greedy"],
        vec!["--epsilon", "1.5"],
        vec!["--seed"],
    ] {
        let output = run_selfplay(&args);
        assert!(!output.status.success(), "{:?} should fail", args);
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Usage: selfplay") || stderr.contains("--epsilon"));
    }
}

#[test]
fn help_exits_cleanly() {
    let output = run_selfplay(&["--help"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--max-turns"));
    assert!(output.stdout.is_empty());
}
