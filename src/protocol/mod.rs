//! Text formats.
//!
//! Board notation for logs, fixtures, and self-play records.

pub mod notation;

pub use notation::{format_board, parse_board, NotationError};
