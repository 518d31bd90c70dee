//! Compact single-line board notation.
//!
//! Every occupied slot is written as `<pos>:<color><count>`, separated by
//! single spaces and listed in position order. Positions use the board
//! numbering (0 and 25 are the bars, 26 and 27 the off trays), colors are
//! `W` or `B`, and the count is one digit `0-9` then `A-F` for 10..=15.
//! An empty board is written `-`.
//!
//! Example (opening position):
//! `1:B2 6:W5 8:W3 12:B5 13:W5 17:B3 19:B5 24:W2`

use std::fmt;

use crate::board::{
    is_bar_pos, is_off_pos, BoardState, Color, Grid, ALL_COLORS, NUM_CHECKERS, NUM_POSITIONS,
};

const COUNT_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Errors that can occur during notation parsing.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    #[error("invalid entry: '{0}'")]
    InvalidEntry(String),

    #[error("invalid position: '{0}'")]
    InvalidPosition(String),

    #[error("position {0} out of range")]
    PositionOutOfRange(usize),

    #[error("invalid color character: '{0}'")]
    InvalidColor(char),

    #[error("invalid count character: '{0}'")]
    InvalidCount(char),

    #[error("zero count at position {0}")]
    ZeroCount(usize),

    #[error("duplicate entry for position {0}")]
    DuplicatePosition(usize),

    #[error("{color:?} checker on the opponent's bar or off tray at {pos}")]
    WrongSide { pos: usize, color: Color },

    #[error("{color:?} has {count} checkers, more than 15")]
    TooManyCheckers { color: Color, count: u32 },
}

fn count_digit(count: u8) -> char {
    COUNT_DIGITS[count.min(NUM_CHECKERS) as usize] as char
}

/// Encodes a board into its notation string.
pub fn format_board(state: &BoardState) -> String {
    let entries: Vec<String> = state
        .slots()
        .filter_map(|(pos, grid)| {
            let color = grid.owner()?;
            Some(format!("{}:{}{}", pos, color.notation_char(), count_digit(grid.count)))
        })
        .collect();

    if entries.is_empty() {
        "-".to_string()
    } else {
        entries.join(" ")
    }
}

/// Parses one `<pos>:<color><count>` entry.
fn parse_entry(entry: &str) -> Result<(usize, Grid), NotationError> {
    let (pos_str, rest) = entry
        .split_once(':')
        .ok_or_else(|| NotationError::InvalidEntry(entry.to_string()))?;
    let pos: usize = pos_str
        .parse()
        .map_err(|_| NotationError::InvalidPosition(pos_str.to_string()))?;
    if pos >= NUM_POSITIONS {
        return Err(NotationError::PositionOutOfRange(pos));
    }

    let mut chars = rest.chars();
    let (Some(color_char), Some(count_char), None) = (chars.next(), chars.next(), chars.next())
    else {
        return Err(NotationError::InvalidEntry(entry.to_string()));
    };
    let color = Color::from_notation_char(color_char)
        .ok_or(NotationError::InvalidColor(color_char))?;
    let count = count_char
        .to_digit(16)
        .filter(|_| !count_char.is_ascii_lowercase())
        .ok_or(NotationError::InvalidCount(count_char))? as u8;
    if count == 0 {
        return Err(NotationError::ZeroCount(pos));
    }
    if (is_bar_pos(pos) && pos != color.bar()) || (is_off_pos(pos) && pos != color.off()) {
        return Err(NotationError::WrongSide { pos, color });
    }

    Ok((pos, Grid::new(color, count)))
}

/// Parses a notation string into a BoardState.
///
/// Per-color totals may be below 15 but never above.
pub fn parse_board(s: &str) -> Result<BoardState, NotationError> {
    let mut state = BoardState::empty();
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return Ok(state);
    }

    for entry in trimmed.split_whitespace() {
        let (pos, grid) = parse_entry(entry)?;
        if !state.grids[pos].is_empty() {
            return Err(NotationError::DuplicatePosition(pos));
        }
        state.grids[pos] = grid;
    }

    for color in ALL_COLORS {
        let count = state.checker_count(color);
        if count > NUM_CHECKERS as u32 {
            return Err(NotationError::TooManyCheckers { color, count });
        }
    }

    Ok(state)
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_board(self))
    }
}
