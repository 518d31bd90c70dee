//! Collapsing actions that reach the same position.
//!
//! Independent moves played in different orders usually end on the same
//! board. Every leaf's resulting board is fingerprinted during generation
//! and kept in a map; a later leaf with the same fingerprint replaces the
//! earlier one, so exactly one representative survives per position.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use super::generate_with;
use super::tree::{ActionTree, NodeId};
use crate::board::{BoardState, Color, Move, BOARD_MAX, BOARD_MIN};

/// Bits used per board point: one color bit plus a four-bit count.
const BITS_PER_POINT: u32 = 5;

/// Largest count a nibble can hold.
const COUNT_MASK: u64 = 0xF;

/// Smallest bucket count handed to the map.
const MIN_BUCKETS: usize = 128;

/// Compact key identifying the checker layout of the 24 board points.
///
/// Each point packs a White bit and its checker count (saturating at 15)
/// into five bits; points 1..=12 fill `lo`, points 13..=24 fill `hi`.
/// Empty points encode as zero whatever their stale color tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
pub struct Fingerprint {
    pub lo: u64,
    pub hi: u64,
}

impl Fingerprint {
    /// Fingerprints the board points of `state`.
    pub fn of(state: &BoardState) -> Self {
        let mut key = Fingerprint::default();
        for pos in BOARD_MIN..=BOARD_MAX {
            let grid = state.grids[pos];
            let mut bits = (grid.count as u64).min(COUNT_MASK);
            if grid.owner() == Some(Color::White) {
                bits |= 1 << 4;
            }
            let index = (pos - BOARD_MIN) as u32;
            let half = if index < 12 { &mut key.lo } else { &mut key.hi };
            *half |= bits << ((index % 12) * BITS_PER_POINT);
        }
        key
    }

    /// The 64-bit hash key: the two halves combined by XOR-with-shift.
    pub const fn key(&self) -> u64 {
        self.lo ^ (self.hi << 1)
    }
}

impl Hash for Fingerprint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.key());
    }
}

/// One deduplicated action and the position it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueAction {
    pub fingerprint: Fingerprint,
    pub moves: Vec<Move>,
}

/// Bucket count for a size hint: the next power of two, at least 128.
fn bucket_count(hint: usize) -> usize {
    hint.next_power_of_two().max(MIN_BUCKETS)
}

/// Generates all legal actions and keeps one per distinct resulting board.
///
/// Actions come back in ascending order of their representative leaf in
/// the generation tree.
pub fn unique_actions(state: &BoardState, color: Color, die1: u8, die2: u8) -> Vec<UniqueAction> {
    let hint = if die1 == die2 { 64 } else { 16 };
    let mut map: HashMap<Fingerprint, NodeId> = HashMap::with_capacity(bucket_count(hint));
    let mut tree = ActionTree::new();
    generate_with(&mut tree, state, color, die1, die2, &mut |leaf, board| {
        map.insert(Fingerprint::of(board), leaf);
    });

    let mut survivors: Vec<(NodeId, Fingerprint)> =
        map.into_iter().map(|(fp, leaf)| (leaf, fp)).collect();
    survivors.sort_unstable_by_key(|&(leaf, _)| leaf);
    survivors
        .into_iter()
        .map(|(leaf, fingerprint)| UniqueAction { fingerprint, moves: tree.path(leaf) })
        .collect()
}

/// Flat form of `unique_actions`: each action's moves in play order,
/// followed by one `Move::SENTINEL`.
pub fn non_equivalent_actions(state: &BoardState, color: Color, die1: u8, die2: u8) -> Vec<Move> {
    let mut flat = Vec::new();
    for action in unique_actions(state, color, die1, die2) {
        flat.extend_from_slice(&action.moves);
        flat.push(Move::SENTINEL);
    }
    flat
}

/// Splits a sentinel-separated move list back into actions. Empty runs
/// between consecutive sentinels are skipped.
pub fn split_actions(flat: &[Move]) -> impl Iterator<Item = &[Move]> {
    flat.split(|m| m.is_sentinel()).filter(|a| !a.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Grid, WHITE_BAR, WHITE_OFF};
    use crate::movegen::{all_rolls, generate_actions};
    use crate::rules::apply_action;

    #[test]
    fn fingerprint_distinguishes_counts_and_colors() {
        let a = BoardState::from_slots(&[(5, Grid::new(Color::White, 4))]);
        let b = BoardState::from_slots(&[(5, Grid::new(Color::White, 5))]);
        let c = BoardState::from_slots(&[(5, Grid::new(Color::Black, 4))]);
        let d = BoardState::from_slots(&[(17, Grid::new(Color::White, 4))]);
        let prints = [a, b, c, d].map(|s| Fingerprint::of(&s));
        for i in 0..prints.len() {
            for j in i + 1..prints.len() {
                assert_ne!(prints[i], prints[j], "{} vs {}", i, j);
            }
        }
    }

    #[test]
    fn fingerprint_ignores_stale_tags() {
        let stale = Grid { color: Some(Color::White), count: 0 };
        let tagged = BoardState::from_slots(&[(9, stale)]);
        assert_eq!(Fingerprint::of(&tagged), Fingerprint::of(&BoardState::empty()));
    }

    #[test]
    fn fingerprint_layout() {
        let state = BoardState::from_slots(&[
            (1, Grid::new(Color::White, 2)),
            (13, Grid::new(Color::Black, 15)),
        ]);
        let fp = Fingerprint::of(&state);
        assert_eq!(fp.lo, 0b1_0010);
        assert_eq!(fp.hi, 0b0_1111);
        assert_eq!(fp.key(), 0b1_0010 ^ 0b1_1110);
    }

    #[test]
    fn bucket_count_rounds_up() {
        assert_eq!(bucket_count(0), 128);
        assert_eq!(bucket_count(16), 128);
        assert_eq!(bucket_count(200), 256);
    }

    #[test]
    fn dedup_never_exceeds_raw_leaves() {
        let state = BoardState::new_game();
        for (d1, d2) in all_rolls() {
            let raw = generate_actions(&state, Color::White, d1, d2).leaf_count();
            let unique = unique_actions(&state, Color::White, d1, d2);
            assert!(unique.len() <= raw);
            assert!(!unique.is_empty());
        }
    }

    #[test]
    fn dedup_results_are_pairwise_distinct_and_replayable() {
        let state = BoardState::new_game();
        let unique = unique_actions(&state, Color::Black, 4, 4);
        let mut prints: Vec<Fingerprint> = Vec::new();
        for action in &unique {
            let mut s = state;
            apply_action(&mut s, Color::Black, &action.moves);
            let fp = Fingerprint::of(&s);
            assert_eq!(fp, action.fingerprint);
            assert!(!prints.contains(&fp));
            prints.push(fp);
        }
    }

    #[test]
    fn opening_two_one_collapses_orders() {
        // 13/11 6/5 is reachable with either die first.
        let state = BoardState::new_game();
        let raw = generate_actions(&state, Color::White, 2, 1).leaf_count();
        let unique = unique_actions(&state, Color::White, 2, 1);
        assert!(unique.len() < raw);
    }

    #[test]
    fn flat_list_roundtrips_through_split() {
        let state = BoardState::new_game();
        let flat = non_equivalent_actions(&state, Color::White, 6, 5);
        assert_eq!(flat.last(), Some(&Move::SENTINEL));
        let split: Vec<Vec<Move>> = split_actions(&flat).map(|a| a.to_vec()).collect();
        let unique: Vec<Vec<Move>> = unique_actions(&state, Color::White, 6, 5)
            .into_iter()
            .map(|a| a.moves)
            .collect();
        assert_eq!(split, unique);
    }

    #[test]
    fn forfeited_roll_yields_empty_list() {
        let state = BoardState::from_slots(&[
            (WHITE_OFF, Grid::new(Color::White, 14)),
            (WHITE_BAR, Grid::new(Color::White, 1)),
            (19, Grid::new(Color::Black, 5)),
            (20, Grid::new(Color::Black, 5)),
            (21, Grid::new(Color::Black, 5)),
        ]);
        assert!(non_equivalent_actions(&state, Color::White, 6, 5).is_empty());
    }

    #[test]
    fn bear_off_race_every_action_bears_off() {
        let state = BoardState::from_slots(&[
            (1, Grid::new(Color::White, 1)),
            (3, Grid::new(Color::White, 1)),
            (WHITE_OFF, Grid::new(Color::White, 13)),
        ]);
        let unique = unique_actions(&state, Color::White, 2, 3);
        // 3/off 1/off, or 3/1 followed by 1/off.
        assert_eq!(unique.len(), 2);
        for action in &unique {
            assert!(action.moves.iter().any(|m| m.to == WHITE_OFF));
        }
    }
}
