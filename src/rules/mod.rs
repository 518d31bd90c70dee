//! Move legality, move application, and game results.
//!
//! `can_move_from` is the single source of truth for whether one checker
//! may travel one die value. `apply_move` performs a validated move,
//! hitting a lone opposing checker if one sits on the destination.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{
    advance, is_bar_pos, is_off_pos, BoardState, Color, Grid, Move, BOARD_MAX, BOARD_MIN,
    NUM_CHECKERS, NUM_HOME_POINTS, NUM_POSITIONS,
};

/// Why a single checker move is not allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum MoveError {
    #[error("move to origin")]
    MoveToOrigin,

    #[error("move from an empty position")]
    MoveEmpty,

    #[error("move an opponent checker")]
    MoveOpponentChecker,

    #[error("checker on the bar must enter first")]
    MoveBarNeeded,

    #[error("destination blocked by opponent")]
    MoveBlocked,

    #[error("move out of range")]
    MoveOutOfRange,

    #[error("cannot bear off")]
    MoveCannotBearOff,
}

/// How decisively a game was won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WinKind {
    Normal,
    Gammon,
    Backgammon,
}

impl WinKind {
    /// Points scored for this kind of win (cube at 1).
    pub const fn points(self) -> u32 {
        match self {
            WinKind::Normal => 1,
            WinKind::Gammon => 2,
            WinKind::Backgammon => 3,
        }
    }
}

/// Outcome of a game; `winner` is `None` while the game is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameResult {
    pub winner: Option<Color>,
    pub kind: WinKind,
}

impl GameResult {
    /// The in-progress result.
    pub const ONGOING: GameResult = GameResult { winner: None, kind: WinKind::Normal };

    /// Returns true once a side has borne off all its checkers.
    pub const fn is_over(&self) -> bool {
        self.winner.is_some()
    }
}

/// Checks whether `color` may move the checker on `from` by `steps` pips.
///
/// Returns the destination slot on success. The destination is `color`'s
/// off tray for a bear-off; it may hold a single opposing checker, which
/// `apply_move` will hit.
pub fn can_move_from(
    state: &BoardState,
    color: Color,
    from: usize,
    steps: u8,
) -> Result<usize, MoveError> {
    let opponent = color.opponent();
    if from >= NUM_POSITIONS || is_off_pos(from) || from == opponent.bar() {
        return Err(MoveError::MoveOutOfRange);
    }

    let (to, exact) = advance(color, from, steps).ok_or(MoveError::MoveOutOfRange)?;
    if to >= NUM_POSITIONS || is_bar_pos(to) || to == opponent.off() {
        return Err(MoveError::MoveOutOfRange);
    }
    if from == to {
        return Err(MoveError::MoveToOrigin);
    }

    let origin = state.grids[from];
    if origin.is_empty() {
        return Err(MoveError::MoveEmpty);
    }
    if origin.color != Some(color) {
        return Err(MoveError::MoveOpponentChecker);
    }

    let bar = color.bar();
    if from != bar && state.bar_count(color) > 0 {
        return Err(MoveError::MoveBarNeeded);
    }

    if to == color.off() {
        if !can_bear_off(state, color) {
            return Err(MoveError::MoveCannotBearOff);
        }
        // An overshooting die may only bear off the rearmost checker.
        if !exact && has_checker_farther(state, color, from) {
            return Err(MoveError::MoveCannotBearOff);
        }
    } else if state.grids[to].owner() == Some(opponent) && state.grids[to].count > 1 {
        return Err(MoveError::MoveBlocked);
    }

    Ok(to)
}

/// Returns true if `color` has a checker on a home point farther from the
/// off tray than `from`.
fn has_checker_farther(state: &BoardState, color: Color, from: usize) -> bool {
    match color {
        Color::White => {
            let end = BOARD_MIN + NUM_HOME_POINTS;
            debug_assert!(from < end);
            (from + 1..end).any(|p| state.grids[p].count_of(color) > 0)
        }
        Color::Black => {
            let start = BOARD_MAX + 1 - NUM_HOME_POINTS;
            debug_assert!(from >= start);
            (start..from).any(|p| state.grids[p].count_of(color) > 0)
        }
    }
}

/// Returns true if `color` can move some checker, bar included, by `steps`.
pub fn can_move(state: &BoardState, color: Color, steps: u8) -> bool {
    (BOARD_MIN..=BOARD_MAX)
        .chain(std::iter::once(color.bar()))
        .any(|from| can_move_from(state, color, from, steps).is_ok())
}

/// Moves one `color` checker from `from` to `to` without validating the
/// rules. Returns true if an opposing checker was hit and sent to its bar.
///
/// Callers must obtain `to` from `can_move_from` first.
///
/// # Panics
///
/// Panics if either slot is out of range, `from` holds no `color` checker,
/// or `to` holds more than one opposing checker.
pub fn apply_move(state: &mut BoardState, color: Color, from: usize, to: usize) -> bool {
    assert!(from < NUM_POSITIONS && to < NUM_POSITIONS, "slot out of range");
    assert!(
        state.grids[from].count_of(color) > 0,
        "no {:?} checker on {}",
        color,
        from
    );

    take_checker(&mut state.grids[from]);

    let dest = state.grids[to];
    match dest.owner() {
        None => {
            state.grids[to] = Grid::new(color, 1);
            false
        }
        Some(owner) if owner == color => {
            state.grids[to].count += 1;
            false
        }
        Some(owner) => {
            assert!(dest.count == 1, "destination {} is blocked", to);
            state.grids[to] = Grid::new(color, 1);
            let bar = owner.bar();
            let on_bar = state.grids[bar].count_of(owner);
            state.grids[bar] = Grid::new(owner, on_bar + 1);
            true
        }
    }
}

/// Removes one checker, clearing the color tag when the slot empties.
fn take_checker(grid: &mut Grid) {
    grid.count -= 1;
    if grid.count == 0 {
        grid.color = None;
    }
}

/// Returns true if `color` has nothing on its bar and every remaining
/// checker inside its home region.
pub fn can_bear_off(state: &BoardState, color: Color) -> bool {
    if state.bar_count(color) > 0 {
        return false;
    }
    (BOARD_MIN..=BOARD_MAX)
        .filter(|&p| !color.is_home(p))
        .all(|p| state.grids[p].count_of(color) == 0)
}

/// Determines the winner, if any, and how large the win is.
///
/// A gammon means the loser has borne off nothing; a backgammon further
/// requires a loser checker on its bar or in the winner's home region.
pub fn result(state: &BoardState) -> GameResult {
    for winner in [Color::White, Color::Black] {
        if state.off_count(winner) != NUM_CHECKERS {
            continue;
        }
        let loser = winner.opponent();
        let kind = if state.off_count(loser) > 0 {
            WinKind::Normal
        } else if state.has_checker_behind(loser) {
            WinKind::Backgammon
        } else {
            WinKind::Gammon
        };
        return GameResult { winner: Some(winner), kind };
    }
    GameResult::ONGOING
}

/// Applies every move of an action in order. Returns the number of hits.
///
/// # Panics
///
/// Panics under the same conditions as `apply_move`.
pub fn apply_action(state: &mut BoardState, color: Color, moves: &[Move]) -> usize {
    let mut hits = 0;
    for m in moves {
        if apply_move(state, color, m.from, m.to) {
            hits += 1;
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BLACK_BAR, BLACK_OFF, WHITE_BAR, WHITE_OFF};

    fn w(count: u8) -> Grid {
        Grid::new(Color::White, count)
    }

    fn b(count: u8) -> Grid {
        Grid::new(Color::Black, count)
    }

    #[test]
    fn opening_simple_moves() {
        let state = BoardState::new_game();
        assert_eq!(can_move_from(&state, Color::White, 13, 6), Ok(7));
        assert_eq!(can_move_from(&state, Color::White, 8, 5), Ok(3));
        assert_eq!(can_move_from(&state, Color::Black, 12, 6), Ok(18));
        assert_eq!(can_move_from(&state, Color::Black, 1, 3), Ok(4));
    }

    #[test]
    fn opening_blocked_points() {
        let state = BoardState::new_game();
        // 24 -> 19 lands on Black's five-checker point.
        assert_eq!(can_move_from(&state, Color::White, 24, 5), Err(MoveError::MoveBlocked));
        // 13 -> 12 lands on Black's midpoint.
        assert_eq!(can_move_from(&state, Color::White, 13, 1), Err(MoveError::MoveBlocked));
    }

    #[test]
    fn origin_errors() {
        let state = BoardState::new_game();
        assert_eq!(can_move_from(&state, Color::White, 2, 1), Err(MoveError::MoveEmpty));
        assert_eq!(
            can_move_from(&state, Color::White, 19, 1),
            Err(MoveError::MoveOpponentChecker)
        );
        assert_eq!(
            can_move_from(&state, Color::White, WHITE_OFF, 1),
            Err(MoveError::MoveOutOfRange)
        );
        assert_eq!(
            can_move_from(&state, Color::White, BLACK_BAR, 1),
            Err(MoveError::MoveOutOfRange)
        );
        assert_eq!(
            can_move_from(&state, Color::White, NUM_POSITIONS, 1),
            Err(MoveError::MoveOutOfRange)
        );
        assert_eq!(can_move_from(&state, Color::White, 13, 0), Err(MoveError::MoveToOrigin));
    }

    #[test]
    fn bar_must_enter_first() {
        let mut state = BoardState::new_game();
        state.grids[6] = w(4);
        state.grids[WHITE_BAR] = w(1);
        assert_eq!(can_move_from(&state, Color::White, 13, 3), Err(MoveError::MoveBarNeeded));
        assert_eq!(can_move_from(&state, Color::White, WHITE_BAR, 3), Ok(22));
        // Entry onto Black's 19 point is blocked.
        assert_eq!(
            can_move_from(&state, Color::White, WHITE_BAR, 6),
            Err(MoveError::MoveBlocked)
        );
    }

    #[test]
    fn hit_sends_checker_to_bar() {
        let mut state = BoardState::from_slots(&[(13, w(2)), (9, b(1))]);
        assert_eq!(can_move_from(&state, Color::White, 13, 4), Ok(9));
        assert!(apply_move(&mut state, Color::White, 13, 9));
        assert_eq!(state.grid(13), w(1));
        assert_eq!(state.grid(9), w(1));
        assert_eq!(state.grid(BLACK_BAR), b(1));
    }

    #[test]
    fn hit_onto_occupied_bar_increments() {
        let mut state = BoardState::from_slots(&[(13, w(1)), (9, b(1)), (BLACK_BAR, b(2))]);
        assert!(apply_move(&mut state, Color::White, 13, 9));
        assert_eq!(state.grid(BLACK_BAR), b(3));
        assert!(state.grid(13).is_empty());
        assert_eq!(state.grid(13).color, None);
    }

    #[test]
    fn move_onto_own_point_stacks() {
        let mut state = BoardState::new_game();
        assert!(!apply_move(&mut state, Color::White, 13, 8));
        assert_eq!(state.grid(13), w(4));
        assert_eq!(state.grid(8), w(4));
        assert_eq!(state.checker_count(Color::White), 15);
    }

    #[test]
    fn move_onto_stale_tag_takes_ownership() {
        let stale = Grid { color: Some(Color::Black), count: 0 };
        let mut state = BoardState::from_slots(&[(13, w(1)), (9, stale)]);
        assert!(!apply_move(&mut state, Color::White, 13, 9));
        assert_eq!(state.grid(9), w(1));
        assert_eq!(state.bar_count(Color::Black), 0);
    }

    #[test]
    #[should_panic]
    fn apply_move_from_empty_panics() {
        let mut state = BoardState::new_game();
        apply_move(&mut state, Color::White, 2, 1);
    }

    #[test]
    fn bear_off_eligibility() {
        let mut state = BoardState::from_slots(&[(3, w(14)), (WHITE_OFF, w(1))]);
        assert!(can_bear_off(&state, Color::White));
        state.grids[7] = w(1);
        state.grids[3] = w(13);
        assert!(!can_bear_off(&state, Color::White));
        state.grids[7] = Grid::EMPTY;
        state.grids[WHITE_BAR] = w(1);
        assert!(!can_bear_off(&state, Color::White));
    }

    #[test]
    fn bear_off_exact_and_overshoot() {
        let state = BoardState::from_slots(&[(2, w(1)), (5, w(1)), (WHITE_OFF, w(13))]);
        // Exact roll always bears off.
        assert_eq!(can_move_from(&state, Color::White, 2, 2), Ok(WHITE_OFF));
        assert_eq!(can_move_from(&state, Color::White, 5, 5), Ok(WHITE_OFF));
        // Overshoot from 2 is refused while a checker sits farther back on 5.
        assert_eq!(
            can_move_from(&state, Color::White, 2, 6),
            Err(MoveError::MoveCannotBearOff)
        );
        // Overshoot from the rearmost checker is fine.
        assert_eq!(can_move_from(&state, Color::White, 5, 6), Ok(WHITE_OFF));
    }

    #[test]
    fn bear_off_black_overshoot() {
        let state = BoardState::from_slots(&[(20, b(1)), (23, b(1)), (BLACK_OFF, b(13))]);
        assert_eq!(can_move_from(&state, Color::Black, 23, 2), Ok(BLACK_OFF));
        assert_eq!(
            can_move_from(&state, Color::Black, 23, 6),
            Err(MoveError::MoveCannotBearOff)
        );
        assert_eq!(can_move_from(&state, Color::Black, 20, 6), Ok(BLACK_OFF));
    }

    #[test]
    fn bear_off_refused_with_checker_outside_home() {
        let state = BoardState::from_slots(&[(3, w(13)), (10, w(1)), (WHITE_OFF, w(1))]);
        assert_eq!(
            can_move_from(&state, Color::White, 3, 3),
            Err(MoveError::MoveCannotBearOff)
        );
        assert_eq!(can_move_from(&state, Color::White, 10, 4), Ok(6));
    }

    #[test]
    fn can_move_any_origin() {
        let state = BoardState::new_game();
        assert!((1..=6).all(|d| can_move(&state, Color::White, d)));
        let closed = BoardState::from_slots(&[
            (WHITE_BAR, w(1)),
            (19, b(2)),
            (20, b(2)),
            (21, b(2)),
            (22, b(2)),
            (23, b(2)),
            (24, b(2)),
        ]);
        assert!((1..=6).all(|d| !can_move(&closed, Color::White, d)));
    }

    #[test]
    fn result_ongoing_and_normal() {
        assert_eq!(result(&BoardState::new_game()), GameResult::ONGOING);
        let state = BoardState::from_slots(&[(WHITE_OFF, w(15)), (BLACK_OFF, b(3)), (20, b(12))]);
        assert_eq!(
            result(&state),
            GameResult { winner: Some(Color::White), kind: WinKind::Normal }
        );
    }

    #[test]
    fn result_gammon_and_backgammon() {
        let gammon = BoardState::from_slots(&[(BLACK_OFF, b(15)), (10, w(15))]);
        assert_eq!(
            result(&gammon),
            GameResult { winner: Some(Color::Black), kind: WinKind::Gammon }
        );
        let backgammon = BoardState::from_slots(&[(BLACK_OFF, b(15)), (10, w(14)), (21, w(1))]);
        assert_eq!(
            result(&backgammon),
            GameResult { winner: Some(Color::Black), kind: WinKind::Backgammon }
        );
        let on_bar = BoardState::from_slots(&[(WHITE_OFF, w(15)), (10, b(14)), (BLACK_BAR, b(1))]);
        assert_eq!(result(&on_bar).kind, WinKind::Backgammon);
        assert_eq!(WinKind::Backgammon.points(), 3);
    }

    #[test]
    fn apply_action_counts_hits() {
        let mut state = BoardState::from_slots(&[(13, w(2)), (9, b(1)), (7, b(1))]);
        let moves = [Move::new(13, 4, 9), Move::new(13, 6, 7)];
        assert_eq!(apply_action(&mut state, Color::White, &moves), 2);
        assert_eq!(state.bar_count(Color::Black), 2);
    }
}
