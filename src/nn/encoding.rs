//! Board state -> TD-Gammon feature vector.
//!
//! Produces the 198-value input expected by the trained value network.
//! Layout, for White then Black:
//!   [0:96]   four thermometer units per board point 1..=24
//!            (count >= 1, >= 2, >= 3, then (count - 3) / 2 above three)
//!   [96]     checkers on the bar / 2
//!   [97]     checkers borne off / 15
//! followed by Black's 98 values at [98:196], and finally
//!   [196:198] side to move: [1, 0] for White, [0, 1] for Black.

use crate::board::{
    BoardState, Color, Move, ALL_COLORS, BOARD_MAX, BOARD_MIN, NUM_CHECKERS, NUM_POINTS,
};
use crate::rules::apply_action;

/// Length of the feature vector.
pub const NUM_FEATURES: usize = 198;

/// Thermometer units per board point.
pub const UNITS_PER_POINT: usize = 4;

/// Values contributed by one color: point blocks plus bar and off.
pub const FEATURES_PER_COLOR: usize = NUM_POINTS * UNITS_PER_POINT + 2;

/// Offset of the side-to-move flags.
pub const FEAT_TURN: usize = 2 * FEATURES_PER_COLOR;

/// Divisor applied to the bar count.
pub const BAR_DIVISOR: f64 = 2.0;

/// Divisor applied to the borne-off count.
pub const OFF_DIVISOR: f64 = NUM_CHECKERS as f64;

/// A feature vector.
pub type Features = [f64; NUM_FEATURES];

/// Offset of `color`'s block of 98 values.
const fn color_base(color: Color) -> usize {
    match color {
        Color::White => 0,
        Color::Black => FEATURES_PER_COLOR,
    }
}

/// Offset of the bar feature for `color`; the off feature follows it.
pub const fn bar_feature(color: Color) -> usize {
    color_base(color) + NUM_POINTS * UNITS_PER_POINT
}

/// Offset of the thermometer block for `color` on board point `pos`.
pub const fn point_feature(color: Color, pos: usize) -> usize {
    color_base(color) + UNITS_PER_POINT * (pos - BOARD_MIN)
}

/// Writes the four thermometer units for `count` checkers.
fn thermometer(units: &mut [f64], count: u8) {
    units[0] = if count >= 1 { 1.0 } else { 0.0 };
    units[1] = if count >= 2 { 1.0 } else { 0.0 };
    units[2] = if count >= 3 { 1.0 } else { 0.0 };
    units[3] = if count >= 4 { (count as f64 - 3.0) / 2.0 } else { 0.0 };
}

/// Encodes `state` with `to_move` as the side to move.
pub fn encode(state: &BoardState, to_move: Color) -> Features {
    let mut vec = [0.0; NUM_FEATURES];
    for color in ALL_COLORS {
        for pos in BOARD_MIN..=BOARD_MAX {
            let at = point_feature(color, pos);
            thermometer(&mut vec[at..at + UNITS_PER_POINT], state.grids[pos].count_of(color));
        }
        let bar = bar_feature(color);
        vec[bar] = state.bar_count(color) as f64 / BAR_DIVISOR;
        vec[bar + 1] = state.off_count(color) as f64 / OFF_DIVISOR;
    }
    match to_move {
        Color::White => vec[FEAT_TURN] = 1.0,
        Color::Black => vec[FEAT_TURN + 1] = 1.0,
    }
    vec
}

/// Encodes the position reached after `color` plays `moves`, from the
/// opponent's side, since the opponent moves next.
///
/// # Panics
///
/// Panics if a move is not applicable; moves must come from generation.
pub fn encode_action(state: &BoardState, color: Color, moves: &[Move]) -> Features {
    let mut next = *state;
    apply_action(&mut next, color, moves);
    encode(&next, color.opponent())
}

/// Rewrites `vec` in place as the same position seen with colors swapped.
///
/// Point `p` of White trades blocks with point `25 - p` of Black, the
/// bar/off pairs trade places, and the side-to-move flags flip. Applying
/// it twice restores the original vector.
pub fn reverse_features(vec: &mut Features) {
    for pos in BOARD_MIN..=BOARD_MAX {
        let i = point_feature(Color::White, pos);
        let j = point_feature(Color::Black, BOARD_MAX + BOARD_MIN - pos);
        for k in 0..UNITS_PER_POINT {
            vec.swap(i + k, j + k);
        }
    }
    let white_bar = bar_feature(Color::White);
    let black_bar = bar_feature(Color::Black);
    vec.swap(white_bar, black_bar);
    vec.swap(white_bar + 1, black_bar + 1);
    vec.swap(FEAT_TURN, FEAT_TURN + 1);
}

/// Returns the reversed copy of `vec`.
pub fn reversed(vec: &Features) -> Features {
    let mut out = *vec;
    reverse_features(&mut out);
    out
}

/// Checker counts recovered from a feature vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodedCounts {
    /// Per color (White, Black) and point index 0..24 for points 1..=24.
    pub points: [[f64; NUM_POINTS]; 2],
    pub bar: [f64; 2],
    pub off: [f64; 2],
    pub to_move: Color,
}

/// Inverts the encoding: point count is `t0 + t1 + t2 + 2 * t3`.
pub fn decode_counts(vec: &Features) -> DecodedCounts {
    let mut decoded = DecodedCounts {
        points: [[0.0; NUM_POINTS]; 2],
        bar: [0.0; 2],
        off: [0.0; 2],
        to_move: if vec[FEAT_TURN + 1] > vec[FEAT_TURN] { Color::Black } else { Color::White },
    };
    for (ci, color) in ALL_COLORS.into_iter().enumerate() {
        for pos in BOARD_MIN..=BOARD_MAX {
            let at = point_feature(color, pos);
            let t = &vec[at..at + UNITS_PER_POINT];
            decoded.points[ci][pos - BOARD_MIN] = t[0] + t[1] + t[2] + 2.0 * t[3];
        }
        let bar = bar_feature(color);
        decoded.bar[ci] = vec[bar] * BAR_DIVISOR;
        decoded.off[ci] = vec[bar + 1] * OFF_DIVISOR;
    }
    decoded
}
