//! Neural network feature encoding for ONNX model inference.
//!
//! Converts `BoardState` into the 198-value TD-Gammon input expected by the
//! trained value network, and mirrors encoded vectors between the two sides.

pub mod encoding;

pub use encoding::{
    decode_counts, encode, encode_action, reverse_features, reversed, DecodedCounts, Features,
    NUM_FEATURES,
};
