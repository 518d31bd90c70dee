//! Gammon engine library.
//!
//! Exposes the board representation, rules, move generation, feature
//! encoding, evaluation, and self-play modules for use by integration tests
//! and the `selfplay` binary.

pub mod board;
pub mod eval;
pub mod movegen;
pub mod nn;
pub mod protocol;
pub mod rules;
pub mod selfplay;
