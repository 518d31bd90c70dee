//! Position evaluation.
//!
//! An `Evaluator` maps an encoded position to the probability that White
//! wins. `score_for` turns that into the mover's win probability under a
//! `ScorePolicy`, which decides whether and how the mirrored position is
//! consulted to compensate for evaluators that are not color-symmetric.

pub(crate) mod heuristic;
pub mod neural;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::board::Color;
use crate::nn::encoding::{reversed, Features};

pub use heuristic::PipCountEvaluator;
pub use neural::NeuralEvaluator;

/// Scores encoded positions.
pub trait Evaluator: Send + Sync {
    /// Probability in `[0, 1]` that White wins from `features`.
    fn evaluate(&self, features: &Features) -> f64;
}

/// How an evaluator's raw output is turned into the mover's score.
///
/// A well-behaved evaluator satisfies `f(s) + f(s') = 1` for a position `s`
/// and its mirror `s'`; a trained network may not, which skews play in
/// favor of one color unless the mirror is taken into account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScorePolicy {
    /// Use `f(s)` for both colors.
    #[default]
    Naive,
    /// White uses `f(s)`; Black evaluates the mirror, `1 - f(s')`.
    ReverseWhite,
    /// Black uses `f(s)`; White evaluates the mirror.
    ReverseBlack,
    /// Both colors use `(f(s) + 1 - f(s')) / 2`.
    ReverseAverage,
}

pub const ALL_POLICIES: [ScorePolicy; 4] = [
    ScorePolicy::Naive,
    ScorePolicy::ReverseWhite,
    ScorePolicy::ReverseBlack,
    ScorePolicy::ReverseAverage,
];

impl ScorePolicy {
    /// Command-line name of the policy.
    pub const fn name(self) -> &'static str {
        match self {
            ScorePolicy::Naive => "naive",
            ScorePolicy::ReverseWhite => "reverse-white",
            ScorePolicy::ReverseBlack => "reverse-black",
            ScorePolicy::ReverseAverage => "reverse-average",
        }
    }
}

impl fmt::Display for ScorePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScorePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_POLICIES
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| format!("unknown score policy '{}'", s))
    }
}

/// Probability that White wins `features` as seen through `policy` when
/// `mover` is the color choosing the action.
pub fn white_score(
    evaluator: &dyn Evaluator,
    policy: ScorePolicy,
    features: &Features,
    mover: Color,
) -> f64 {
    let mirrored = |f: &Features| 1.0 - evaluator.evaluate(&reversed(f));
    match (policy, mover) {
        (ScorePolicy::Naive, _)
        | (ScorePolicy::ReverseWhite, Color::White)
        | (ScorePolicy::ReverseBlack, Color::Black) => evaluator.evaluate(features),
        (ScorePolicy::ReverseWhite, Color::Black) | (ScorePolicy::ReverseBlack, Color::White) => {
            mirrored(features)
        }
        (ScorePolicy::ReverseAverage, _) => {
            (evaluator.evaluate(features) + mirrored(features)) / 2.0
        }
    }
}

/// The mover's win probability for the position encoded in `features`.
///
/// `features` is normally produced by `encode_action`, i.e. the position
/// after `mover`'s action with the opponent to move.
pub fn score_for(
    evaluator: &dyn Evaluator,
    policy: ScorePolicy,
    features: &Features,
    mover: Color,
) -> f64 {
    let white = white_score(evaluator, policy, features, mover);
    match mover {
        Color::White => white,
        Color::Black => 1.0 - white,
    }
}
