//! Board state representation.
//!
//! Holds the full checker layout of a backgammon game at a point in time:
//! one `Grid` per slot, indexed by the numbering in `board::position`.

use serde::{Deserialize, Serialize};

use super::position::{Color, BOARD_MAX, BOARD_MIN, NUM_CHECKERS, NUM_POSITIONS};

/// Occupancy of a single slot.
///
/// A grid with `count == 0` is empty whatever its `color` says.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Grid {
    pub color: Option<Color>,
    pub count: u8,
}

impl Grid {
    /// An empty slot.
    pub const EMPTY: Grid = Grid { color: None, count: 0 };

    /// Creates a grid holding `count` checkers of `color`.
    pub const fn new(color: Color, count: u8) -> Self {
        Grid { color: Some(color), count }
    }

    /// Returns true if no checker occupies the slot.
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the occupying color, treating a zero count as empty.
    pub fn owner(&self) -> Option<Color> {
        if self.count == 0 {
            None
        } else {
            self.color
        }
    }

    /// Number of `color` checkers on this slot.
    pub fn count_of(&self, color: Color) -> u8 {
        if self.owner() == Some(color) {
            self.count
        } else {
            0
        }
    }
}

/// Complete board state.
///
/// A fixed-size array of 28 grids; the type is `Copy`, so speculative
/// search clones it by value and never shares mutable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardState {
    pub grids: [Grid; NUM_POSITIONS],
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new_game()
    }
}

impl BoardState {
    /// Creates a board with every slot empty.
    pub fn empty() -> Self {
        BoardState { grids: [Grid::EMPTY; NUM_POSITIONS] }
    }

    /// Creates a board with the standard opening layout.
    pub fn new_game() -> Self {
        let mut state = Self::empty();
        state.grids[BOARD_MIN + 23] = Grid::new(Color::White, 2);
        state.grids[BOARD_MIN + 12] = Grid::new(Color::White, 5);
        state.grids[BOARD_MIN + 7] = Grid::new(Color::White, 3);
        state.grids[BOARD_MIN + 5] = Grid::new(Color::White, 5);

        state.grids[BOARD_MIN] = Grid::new(Color::Black, 2);
        state.grids[BOARD_MIN + 11] = Grid::new(Color::Black, 5);
        state.grids[BOARD_MIN + 16] = Grid::new(Color::Black, 3);
        state.grids[BOARD_MIN + 18] = Grid::new(Color::Black, 5);
        state
    }

    /// Creates a board from explicit `(position, grid)` pairs; every other
    /// slot is empty. Later pairs overwrite earlier ones at the same slot.
    ///
    /// The caller is responsible for the per-color checker totals.
    ///
    /// # Panics
    ///
    /// Panics if a position is outside `0..NUM_POSITIONS`.
    pub fn from_slots(slots: &[(usize, Grid)]) -> Self {
        let mut state = Self::empty();
        for &(pos, grid) in slots {
            assert!(pos < NUM_POSITIONS, "position {} out of range", pos);
            state.grids[pos] = grid;
        }
        state
    }

    /// Returns the grid at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside `0..NUM_POSITIONS`.
    pub fn grid(&self, pos: usize) -> Grid {
        self.grids[pos]
    }

    /// Iterates `(position, grid)` over all 28 slots.
    pub fn slots(&self) -> impl Iterator<Item = (usize, Grid)> + '_ {
        self.grids.iter().copied().enumerate()
    }

    /// Total number of `color` checkers across all slots, bar and off included.
    pub fn checker_count(&self, color: Color) -> u32 {
        self.grids.iter().map(|g| g.count_of(color) as u32).sum()
    }

    /// Number of `color` checkers on its bar.
    pub fn bar_count(&self, color: Color) -> u8 {
        self.grids[color.bar()].count_of(color)
    }

    /// Number of `color` checkers borne off.
    pub fn off_count(&self, color: Color) -> u8 {
        self.grids[color.off()].count_of(color)
    }

    /// Total pips `color` still has to travel to bear everything off.
    pub fn pip_count(&self, color: Color) -> u32 {
        self.slots()
            .map(|(pos, g)| g.count_of(color) as u32 * color.pip_distance(pos) as u32)
            .sum()
    }

    /// Returns true if each color holds exactly fifteen checkers.
    pub fn is_complete(&self) -> bool {
        self.checker_count(Color::White) == NUM_CHECKERS as u32
            && self.checker_count(Color::Black) == NUM_CHECKERS as u32
    }

    /// Returns true if `color` has a checker on a point of the opponent's
    /// home region or on its own bar.
    pub(crate) fn has_checker_behind(&self, color: Color) -> bool {
        if self.bar_count(color) > 0 {
            return true;
        }
        let home = color.opponent();
        (BOARD_MIN..=BOARD_MAX)
            .filter(|&p| home.is_home(p))
            .any(|p| self.grids[p].count_of(color) > 0)
    }
}
