//! Legal turn generation.
//!
//! Enumerates every maximal legal move sequence for a color and a roll as
//! an `ActionTree`. Doubles are played as four uses of the same value;
//! other rolls are explored in both die orders under one root, because a
//! move legal with one die first may be illegal with the other die first.

pub mod dedup;
pub mod tree;

pub use dedup::{non_equivalent_actions, split_actions, unique_actions, Fingerprint, UniqueAction};
pub use tree::{ActionTree, Children, NodeId, MAX_ACTION_LEN};

use crate::board::{BoardState, Color, Move, BOARD_MAX, BOARD_MIN};
use crate::rules::{apply_move, can_move_from};

/// Expands a roll into the die sequences to explore.
///
/// Returns one four-long sequence for doubles, otherwise the two orders.
pub fn die_sequences(die1: u8, die2: u8) -> Vec<Vec<u8>> {
    if die1 == die2 {
        vec![vec![die1; MAX_ACTION_LEN]]
    } else {
        vec![vec![die1, die2], vec![die2, die1]]
    }
}

/// Generates the tree of all legal actions for `color` rolling `die1`, `die2`.
///
/// A tree without actions means the roll cannot be played and the turn is
/// forfeited.
pub fn generate_actions(state: &BoardState, color: Color, die1: u8, die2: u8) -> ActionTree {
    let mut tree = ActionTree::new();
    generate_actions_into(&mut tree, state, color, die1, die2);
    tree
}

/// Like `generate_actions`, but refills an existing tree so its arena can
/// be reused across turns.
pub fn generate_actions_into(
    tree: &mut ActionTree,
    state: &BoardState,
    color: Color,
    die1: u8,
    die2: u8,
) {
    generate_with(tree, state, color, die1, die2, &mut |_, _| {});
}

/// Core generator. `on_leaf` sees every leaf right after its subtree is
/// complete, together with the board that leaf's path produces.
pub(crate) fn generate_with<F>(
    tree: &mut ActionTree,
    state: &BoardState,
    color: Color,
    die1: u8,
    die2: u8,
    on_leaf: &mut F,
) where
    F: FnMut(NodeId, &BoardState),
{
    tree.clear();
    for dice in die_sequences(die1, die2) {
        expand(tree, state, color, ActionTree::ROOT, &dice, on_leaf);
    }
}

/// Tries every origin for the next die and recurses on the remainder.
fn expand<F>(
    tree: &mut ActionTree,
    state: &BoardState,
    color: Color,
    parent: NodeId,
    dice: &[u8],
    on_leaf: &mut F,
) where
    F: FnMut(NodeId, &BoardState),
{
    let bar = color.bar();
    if state.bar_count(color) > 0 {
        try_from(tree, state, color, parent, dice, bar, on_leaf);
    } else {
        for from in BOARD_MIN..=BOARD_MAX {
            try_from(tree, state, color, parent, dice, from, on_leaf);
        }
    }
}

fn try_from<F>(
    tree: &mut ActionTree,
    state: &BoardState,
    color: Color,
    parent: NodeId,
    dice: &[u8],
    from: usize,
    on_leaf: &mut F,
) where
    F: FnMut(NodeId, &BoardState),
{
    let Some((&steps, rest)) = dice.split_first() else {
        return;
    };
    let Ok(to) = can_move_from(state, color, from, steps) else {
        return;
    };

    let mut next = *state;
    apply_move(&mut next, color, from, to);
    let node = tree.push(parent, Move::new(from, steps, to));
    if !rest.is_empty() {
        expand(tree, &next, color, node, rest, on_leaf);
    }
    if tree.is_leaf(node) {
        on_leaf(node, &next);
    }
}

/// Counts the legal actions for a roll without keeping the tree.
pub fn count_actions(state: &BoardState, color: Color, die1: u8, die2: u8) -> usize {
    generate_actions(state, color, die1, die2).leaf_count()
}

/// All 21 distinct rolls as `(die1, die2)` with `die1 <= die2`.
pub fn all_rolls() -> impl Iterator<Item = (u8, u8)> {
    (1..=6u8).flat_map(|a| (a..=6u8).map(move |b| (a, b)))
}
