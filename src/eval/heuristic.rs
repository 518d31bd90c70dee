//! Heuristic position evaluation.
//!
//! A race evaluator working purely on the feature vector: it recovers
//! checker counts, compares pip counts and borne-off checkers, credits the
//! side to move with half a roll, and squashes the lead through a logistic.
//! Mirrored positions score to exactly `1 - f(s)`, so every `ScorePolicy`
//! agrees on it.

use super::Evaluator;
use crate::board::{Color, BOARD_MIN, NUM_CHECKERS};
use crate::nn::encoding::{decode_counts, DecodedCounts, Features};

/// Pip value of a checker on the bar.
const BAR_PIPS: f64 = 25.0;

/// Average pips moved by one roll, doubles included.
const AVERAGE_ROLL_PIPS: f64 = 8.17;

/// Borne-off count at which a side has won.
const ALL_OFF: f64 = NUM_CHECKERS as f64 - 0.5;

/// Logistic race evaluator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipCountEvaluator {
    /// Slope of the logistic, per pip of lead.
    pub scale: f64,
    /// Pips credited to the side to move.
    pub tempo: f64,
    /// Extra pips credited per checker already borne off.
    pub off_weight: f64,
}

impl Default for PipCountEvaluator {
    fn default() -> Self {
        PipCountEvaluator { scale: 0.08, tempo: AVERAGE_ROLL_PIPS / 2.0, off_weight: 2.0 }
    }
}

/// Pips `color` still has to travel, from decoded counts.
fn pips(counts: &DecodedCounts, ci: usize, color: Color) -> f64 {
    let board: f64 = counts.points[ci]
        .iter()
        .enumerate()
        .map(|(i, &n)| n * color.pip_distance(i + BOARD_MIN) as f64)
        .sum();
    board + counts.bar[ci] * BAR_PIPS
}

impl PipCountEvaluator {
    /// White's lead in pips, positive when White is ahead.
    pub fn white_lead(&self, features: &Features) -> f64 {
        let counts = decode_counts(features);
        let (white, black) = (Color::White as usize, Color::Black as usize);
        let pip_lead = pips(&counts, black, Color::Black) - pips(&counts, white, Color::White);
        let off_lead = (counts.off[white] - counts.off[black]) * self.off_weight;
        let tempo = match counts.to_move {
            Color::White => self.tempo,
            Color::Black => -self.tempo,
        };
        pip_lead + off_lead + tempo
    }
}

impl Evaluator for PipCountEvaluator {
    fn evaluate(&self, features: &Features) -> f64 {
        let counts = decode_counts(features);
        if counts.off[Color::White as usize] >= ALL_OFF {
            return 1.0;
        }
        if counts.off[Color::Black as usize] >= ALL_OFF {
            return 0.0;
        }
        1.0 / (1.0 + (-self.scale * self.white_lead(features)).exp())
    }
}
