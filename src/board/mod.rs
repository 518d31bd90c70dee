//! Board representation and game-state types.
//!
//! Contains checker colors, the slot numbering, per-slot grids, the
//! overall board state, and single-checker moves.

pub mod moves;
pub mod position;
pub mod state;

pub use moves::{format_action, Move};
pub use position::{
    advance, is_bar_pos, is_board_pos, is_off_pos, Color, ALL_COLORS, BLACK_BAR, BLACK_OFF,
    BOARD_MAX, BOARD_MIN, NUM_CHECKERS, NUM_HOME_POINTS, NUM_POINTS, NUM_POSITIONS, WHITE_BAR,
    WHITE_OFF,
};
pub use state::{BoardState, Grid};
