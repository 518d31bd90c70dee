//! Single-checker moves.
//!
//! A `Move` relocates one checker by one die value. A full turn is an
//! ordered sequence of one to four moves; flat action lists separate turns
//! with `Move::SENTINEL`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One checker moved `steps` pips from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Move {
    pub from: usize,
    pub steps: u8,
    pub to: usize,
}

impl Move {
    /// Separator between actions in a flat move list. No legal move has
    /// zero steps.
    pub const SENTINEL: Move = Move { from: 0, steps: 0, to: 0 };

    /// Creates a move.
    pub const fn new(from: usize, steps: u8, to: usize) -> Self {
        Move { from, steps, to }
    }

    /// Returns true if this is the action separator.
    pub const fn is_sentinel(&self) -> bool {
        self.steps == 0
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}->{}", self.from, self.steps, self.to)
    }
}

/// Formats an action as space-separated moves, e.g. `13-6->7 8-5->3`.
pub fn format_action(moves: &[Move]) -> String {
    moves
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
