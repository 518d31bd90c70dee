//! Self-play game generation.
//!
//! Plays full games between two evaluators. Each turn rolls the dice,
//! deduplicates the legal actions, scores every candidate by encoding the
//! position it leads to, and plays the best one (or a random one with
//! probability `epsilon`). Records per-turn boards, rolls, and chosen
//! actions for training and for comparing score policies.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::board::{BoardState, Color, Move, ALL_COLORS};
use crate::eval::{score_for, Evaluator, PipCountEvaluator, ScorePolicy};
use crate::movegen::unique_actions;
use crate::nn::encoding::encode_action;
use crate::protocol::format_board;
use crate::rules::{apply_action, result, GameResult, WinKind};

/// Configuration for self-play game generation.
#[derive(Debug, Clone)]
pub struct SelfPlayConfig {
    /// Number of games to play.
    pub num_games: usize,
    /// Turn cap; a game reaching it ends without a winner.
    pub max_turns: usize,
    /// How evaluator output is turned into a mover's score.
    pub policy: ScorePolicy,
    /// Probability of playing a uniformly random action instead of the best.
    pub epsilon: f64,
    /// Number of parallel threads for concurrent games.
    pub threads: usize,
    /// Random seed (0 = use entropy). Game `i` uses `seed + i`.
    pub seed: u64,
    /// Keep a `TurnRecord` for every turn.
    pub record_positions: bool,
    /// Suppress per-game progress output.
    pub quiet: bool,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            num_games: 10,
            max_turns: 10_000,
            policy: ScorePolicy::Naive,
            epsilon: 0.0,
            threads: 1,
            seed: 0,
            record_positions: false,
            quiet: false,
        }
    }
}

/// The evaluator driving each color.
#[derive(Clone)]
pub struct Players {
    pub white: Arc<dyn Evaluator>,
    pub black: Arc<dyn Evaluator>,
}

impl Players {
    /// Both colors use the same evaluator.
    pub fn symmetric(evaluator: Arc<dyn Evaluator>) -> Self {
        Players { white: Arc::clone(&evaluator), black: evaluator }
    }

    fn for_color(&self, color: Color) -> &dyn Evaluator {
        match color {
            Color::White => self.white.as_ref(),
            Color::Black => self.black.as_ref(),
        }
    }
}

impl Default for Players {
    fn default() -> Self {
        Players::symmetric(Arc::new(PipCountEvaluator::default()))
    }
}

/// One played (or forfeited) turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnRecord {
    /// 1-based turn number.
    pub turn: usize,
    pub color: Color,
    pub dice: [u8; 2],
    /// Board notation before the action.
    pub board: String,
    /// Number of distinct legal actions.
    pub num_actions: usize,
    /// Chosen action; empty when the turn was forfeited.
    pub action: Vec<Move>,
    /// Mover's score of the chosen action, absent for forfeits.
    pub score: Option<f64>,
    /// True if the action was picked at random.
    pub explored: bool,
}

/// A complete self-play game record.
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    /// Sequential game ID.
    pub game_id: usize,
    pub winner: Option<Color>,
    /// Size of the win; absent when the turn cap was hit.
    pub kind: Option<WinKind>,
    pub points: u32,
    /// Turns played, forfeits included.
    pub turns: usize,
    pub forfeits: usize,
    /// Color that moved first.
    pub first: Color,
    pub final_board: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<TurnRecord>,
}

fn roll(rng: &mut SmallRng) -> [u8; 2] {
    [rng.gen_range(1..=6), rng.gen_range(1..=6)]
}

/// Opening roll: doubles are rerolled; the higher die moves first as White.
fn opening_roll(rng: &mut SmallRng) -> (Color, [u8; 2]) {
    loop {
        let dice = roll(rng);
        if dice[0] != dice[1] {
            let first = if dice[0] > dice[1] { Color::White } else { Color::Black };
            return (first, dice);
        }
    }
}

/// Picks an action for `color` from `state` and `dice`.
///
/// Returns `(action, score, explored, num_actions)`; the action is empty
/// when no legal action exists.
fn choose_action(
    state: &BoardState,
    color: Color,
    dice: [u8; 2],
    evaluator: &dyn Evaluator,
    config: &SelfPlayConfig,
    rng: &mut SmallRng,
) -> (Vec<Move>, Option<f64>, bool, usize) {
    let mut actions = unique_actions(state, color, dice[0], dice[1]);
    let n = actions.len();
    if n == 0 {
        return (Vec::new(), None, false, 0);
    }

    let score = |moves: &[Move]| {
        score_for(evaluator, config.policy, &encode_action(state, color, moves), color)
    };

    if config.epsilon > 0.0 && rng.gen::<f64>() < config.epsilon {
        let pick = actions.swap_remove(rng.gen_range(0..n));
        let s = score(&pick.moves);
        return (pick.moves, Some(s), true, n);
    }

    let mut best = 0;
    let mut best_score = f64::NEG_INFINITY;
    for (i, action) in actions.iter().enumerate() {
        let s = score(&action.moves);
        if s > best_score {
            best = i;
            best_score = s;
        }
    }
    let pick = actions.swap_remove(best);
    (pick.moves, Some(best_score), false, n)
}

/// Plays one full game.
pub fn play_game(
    config: &SelfPlayConfig,
    players: &Players,
    game_id: usize,
    rng: &mut SmallRng,
) -> GameRecord {
    let mut state = BoardState::new_game();
    let mut history = Vec::new();
    let mut forfeits = 0;
    let mut turns = 0;

    let (first, mut dice) = opening_roll(rng);
    let mut color = first;
    let mut outcome = GameResult::ONGOING;

    while turns < config.max_turns {
        if turns > 0 {
            dice = roll(rng);
        }
        turns += 1;

        let board = if config.record_positions { format_board(&state) } else { String::new() };
        let (action, score, explored, num_actions) =
            choose_action(&state, color, dice, players.for_color(color), config, rng);
        if action.is_empty() {
            forfeits += 1;
        } else {
            apply_action(&mut state, color, &action);
        }

        if config.record_positions {
            history.push(TurnRecord {
                turn: turns,
                color,
                dice,
                board,
                num_actions,
                action,
                score,
                explored,
            });
        }

        outcome = result(&state);
        if outcome.is_over() {
            break;
        }
        color = color.opponent();
    }

    let kind = outcome.winner.map(|_| outcome.kind);
    GameRecord {
        game_id,
        winner: outcome.winner,
        kind,
        points: kind.map_or(0, WinKind::points),
        turns,
        forfeits,
        first,
        final_board: format_board(&state),
        history,
    }
}

fn game_rng(config: &SelfPlayConfig, game_id: usize) -> SmallRng {
    if config.seed != 0 {
        SmallRng::seed_from_u64(config.seed.wrapping_add(game_id as u64))
    } else {
        SmallRng::from_entropy()
    }
}

fn log_game(config: &SelfPlayConfig, n: usize, game: &GameRecord, elapsed: f64) {
    let outcome = match (game.winner, game.kind) {
        (Some(w), Some(k)) => format!("{:?} wins ({:?})", w, k),
        _ => "unfinished".to_string(),
    };
    eprintln!(
        "Game {}/{}: {} in {} turns ({:.2}s)",
        n, config.num_games, outcome, game.turns, elapsed,
    );
}

/// Runs self-play generation and returns all game records, ordered by id.
pub fn run_self_play(config: &SelfPlayConfig, players: &Players) -> Vec<GameRecord> {
    let mut games = Vec::with_capacity(config.num_games);
    run_self_play_with_callback(config, players, |game| {
        games.push(game);
    });
    games.sort_by_key(|g| g.game_id);
    games
}

/// Runs self-play generation, calling `on_game` with each completed game record.
///
/// With more than one thread, games arrive in completion order.
pub fn run_self_play_with_callback<F>(config: &SelfPlayConfig, players: &Players, on_game: F)
where
    F: FnMut(GameRecord) + Send,
{
    if config.threads > 1 {
        run_self_play_parallel(config, players, on_game);
    } else {
        run_self_play_sequential(config, players, on_game);
    }
}

/// Sequential self-play: plays games one at a time.
fn run_self_play_sequential<F>(config: &SelfPlayConfig, players: &Players, mut on_game: F)
where
    F: FnMut(GameRecord),
{
    for i in 0..config.num_games {
        let mut rng = game_rng(config, i);
        let game_start = Instant::now();
        let game = play_game(config, players, i, &mut rng);
        if !config.quiet {
            log_game(config, i + 1, &game, game_start.elapsed().as_secs_f64());
        }
        on_game(game);
    }
}

/// Parallel self-play: plays games concurrently using rayon.
/// Uses a channel to deliver completed games to the callback from worker threads.
fn run_self_play_parallel<F>(config: &SelfPlayConfig, players: &Players, mut on_game: F)
where
    F: FnMut(GameRecord) + Send,
{
    use rayon::prelude::*;
    use std::sync::mpsc;

    let pool = match rayon::ThreadPoolBuilder::new().num_threads(config.threads).build() {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Failed to build thread pool ({}), playing sequentially", e);
            return run_self_play_sequential(config, players, on_game);
        }
    };

    let completed = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<GameRecord>();
    let config_clone = config.clone();
    let players_clone = players.clone();
    let handle = std::thread::spawn(move || {
        pool.install(|| {
            (0..config_clone.num_games)
                .into_par_iter()
                .for_each_with(tx, |tx, i| {
                    let mut rng = game_rng(&config_clone, i);
                    let game_start = Instant::now();
                    let game = play_game(&config_clone, &players_clone, i, &mut rng);
                    if !config_clone.quiet {
                        let n = completed.fetch_add(1, Ordering::Relaxed) + 1;
                        log_game(&config_clone, n, &game, game_start.elapsed().as_secs_f64());
                    }
                    let _ = tx.send(game);
                });
        });
    });

    // Receive completed games on the calling thread and pass to callback.
    for game in rx {
        on_game(game);
    }

    if let Err(panic) = handle.join() {
        std::panic::resume_unwind(panic);
    }
}

/// Writes game records as JSONL (one JSON object per game, one per line).
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> std::io::Result<()> {
    for game in games {
        serde_json::to_writer(&mut *out, game)?;
        writeln!(out)?;
    }
    out.flush()
}

/// Prints aggregate statistics for a batch of games to stderr.
pub fn print_summary(games: &[GameRecord]) {
    let total = games.len();
    if total == 0 {
        eprintln!("=== Self-Play Summary ===");
        eprintln!("Games: 0");
        return;
    }

    let turns: usize = games.iter().map(|g| g.turns).sum();
    let forfeits: usize = games.iter().map(|g| g.forfeits).sum();
    let unfinished = games.iter().filter(|g| g.winner.is_none()).count();

    eprintln!("=== Self-Play Summary ===");
    eprintln!("Games: {}", total);
    eprintln!("Avg turns: {:.1}", turns as f64 / total as f64);
    eprintln!("Forfeited turns: {}", forfeits);
    eprintln!("Unfinished (turn cap): {}", unfinished);
    eprintln!("Win distribution:");
    for color in ALL_COLORS {
        let won: Vec<&GameRecord> = games.iter().filter(|g| g.winner == Some(color)).collect();
        let count_kind = |k: WinKind| won.iter().filter(|g| g.kind == Some(k)).count();
        let points: u32 = won.iter().map(|g| g.points).sum();
        eprintln!(
            "  {:?}: {} ({:.1}%), gammons {}, backgammons {}, points {}",
            color,
            won.len(),
            won.len() as f64 / total as f64 * 100.0,
            count_kind(WinKind::Gammon),
            count_kind(WinKind::Backgammon),
            points,
        );
    }
}
