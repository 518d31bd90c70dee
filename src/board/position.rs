//! Checker colors and the 28-slot position numbering.
//!
//! ```text
//!    13 14 15 16 17 18  25   19 20 21 22 23 24 27
//!   +-=--=--=--=--=--=-+-=-+-=--=--=--=--=--=-+-=-+
//!   | W           B    |   | B              W |   |
//!   | W           B    |   | B  BLACK HOME    | O |
//!   | W                | B | B                | F |
//!   +------------------+ A +------------------+ F |
//!   | B                | R | W                |   |
//!   | B           W    |   | W  WHITE HOME    |   |
//!   | B           W    |   | W              B |   |
//!   +-=--=--=--=--=--=-+-=-+-=--=--=--=--=--=-+-=-+
//!    12 11 10  9  8  7   0   6  5  4  3  2  1  26
//! ```
//!
//! White moves from 24 towards 1 and bears off into slot 26; Black moves
//! from 1 towards 24 and bears off into slot 27. Each side's bar sits just
//! behind its entry quadrant: 25 for White, 0 for Black.

use serde::{Deserialize, Serialize};

/// Black's bar slot.
pub const BLACK_BAR: usize = 0;
/// Lowest board point.
pub const BOARD_MIN: usize = 1;
/// Highest board point.
pub const BOARD_MAX: usize = 24;
/// White's bar slot.
pub const WHITE_BAR: usize = 25;
/// White's borne-off slot.
pub const WHITE_OFF: usize = 26;
/// Black's borne-off slot.
pub const BLACK_OFF: usize = 27;

/// Total number of slots: 24 points, two bars, two off trays.
pub const NUM_POSITIONS: usize = 28;
/// Number of board points.
pub const NUM_POINTS: usize = BOARD_MAX - BOARD_MIN + 1;
/// Number of points in a home region.
pub const NUM_HOME_POINTS: usize = 6;
/// Checkers per side.
pub const NUM_CHECKERS: u8 = 15;

/// A checker color, doubling as the player identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

/// Both colors in feature-encoding order.
pub const ALL_COLORS: [Color; 2] = [Color::White, Color::Black];

impl Color {
    /// Returns the other side.
    pub const fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Returns this color's bar slot.
    pub const fn bar(self) -> usize {
        match self {
            Color::White => WHITE_BAR,
            Color::Black => BLACK_BAR,
        }
    }

    /// Returns this color's borne-off slot.
    pub const fn off(self) -> usize {
        match self {
            Color::White => WHITE_OFF,
            Color::Black => BLACK_OFF,
        }
    }

    /// Returns true if `pos` lies in this color's home region.
    pub const fn is_home(self, pos: usize) -> bool {
        match self {
            Color::White => pos >= BOARD_MIN && pos < BOARD_MIN + NUM_HOME_POINTS,
            Color::Black => pos > BOARD_MAX - NUM_HOME_POINTS && pos <= BOARD_MAX,
        }
    }

    /// Returns the single-character notation abbreviation.
    pub const fn notation_char(self) -> char {
        match self {
            Color::White => 'W',
            Color::Black => 'B',
        }
    }

    /// Parses a color from its single-character notation abbreviation.
    pub fn from_notation_char(c: char) -> Option<Color> {
        match c {
            'W' => Some(Color::White),
            'B' => Some(Color::Black),
            _ => None,
        }
    }

    /// Distance in pips from `pos` to this color's off tray.
    ///
    /// The bar counts as 25 pips for either side; the off tray counts as 0.
    pub const fn pip_distance(self, pos: usize) -> usize {
        match self {
            Color::White => match pos {
                WHITE_OFF => 0,
                WHITE_BAR => 25,
                _ => pos,
            },
            Color::Black => match pos {
                BLACK_OFF => 0,
                BLACK_BAR => 25,
                _ => BOARD_MAX + 1 - pos,
            },
        }
    }
}

/// Returns true if `pos` is one of the 24 board points.
pub const fn is_board_pos(pos: usize) -> bool {
    pos >= BOARD_MIN && pos <= BOARD_MAX
}

/// Returns true if `pos` is either bar slot.
pub const fn is_bar_pos(pos: usize) -> bool {
    pos == WHITE_BAR || pos == BLACK_BAR
}

/// Returns true if `pos` is either off tray.
pub const fn is_off_pos(pos: usize) -> bool {
    pos == WHITE_OFF || pos == BLACK_OFF
}

/// Advances `from` by `steps` pips in `color`'s direction of travel.
///
/// Overshooting the board edge lands on the color's off tray; the second
/// value is false only when that overshoot went beyond one past the edge.
/// Returns `None` when the arithmetic leaves the slot range entirely.
pub fn advance(color: Color, from: usize, steps: u8) -> Option<(usize, bool)> {
    let from = from as isize;
    let steps = steps as isize;
    match color {
        Color::White => {
            let to = from - steps;
            if to < BOARD_MIN as isize {
                return Some((WHITE_OFF, to == BOARD_MIN as isize - 1));
            }
            usize::try_from(to).ok().map(|to| (to, true))
        }
        Color::Black => {
            let to = from + steps;
            if to > BOARD_MAX as isize {
                return Some((BLACK_OFF, to == BOARD_MAX as isize + 1));
            }
            usize::try_from(to).ok().map(|to| (to, true))
        }
    }
}
