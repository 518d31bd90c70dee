//! Neural network evaluation via ONNX Runtime.
//!
//! Loads a TD-Gammon value model and runs inference using the `ort` crate.
//! The model takes one `GameState` tensor of 198 doubles and returns the
//! `WhiteWinRate` scalar as its first output. Falls back to the pip-count
//! heuristic when no model is available.

#[cfg(feature = "neural")]
use ort::session::{builder::GraphOptimizationLevel, Session};
#[cfg(feature = "neural")]
use std::sync::Mutex;

use super::{Evaluator, PipCountEvaluator};
use crate::nn::encoding::Features;
#[cfg(feature = "neural")]
use crate::nn::encoding::NUM_FEATURES;

/// Neural network evaluator. Holds the ONNX session for the value model.
pub struct NeuralEvaluator {
    #[cfg(feature = "neural")]
    session: Option<Mutex<Session>>,
    fallback: PipCountEvaluator,
}

impl NeuralEvaluator {
    /// Creates a new NeuralEvaluator, loading the ONNX model at `model_path`.
    ///
    /// If the file does not exist or fails to load, the session is set to
    /// None and evaluation falls back to the heuristic.
    pub fn new(model_path: Option<&str>) -> Self {
        #[cfg(feature = "neural")]
        {
            let session = model_path.and_then(load_session).map(Mutex::new);
            if session.is_some() {
                eprintln!("info string Loaded value ONNX model");
            }
            NeuralEvaluator { session, fallback: PipCountEvaluator::default() }
        }

        #[cfg(not(feature = "neural"))]
        {
            if model_path.is_some() {
                eprintln!("info string Neural eval disabled (compiled without 'neural' feature)");
            }
            NeuralEvaluator { fallback: PipCountEvaluator::default() }
        }
    }

    /// Returns true if the value model is loaded.
    pub fn has_model(&self) -> bool {
        #[cfg(feature = "neural")]
        {
            self.session.is_some()
        }
        #[cfg(not(feature = "neural"))]
        {
            false
        }
    }

    /// Runs the value network on one feature vector.
    ///
    /// Returns None if no model is loaded or if inference fails.
    pub fn value(&self, features: &Features) -> Option<f64> {
        #[cfg(feature = "neural")]
        {
            let mutex = self.session.as_ref()?;
            let mut session = mutex.lock().ok()?;
            run_value_inference(&mut session, features)
        }
        #[cfg(not(feature = "neural"))]
        {
            let _ = features;
            None
        }
    }
}

impl Evaluator for NeuralEvaluator {
    fn evaluate(&self, features: &Features) -> f64 {
        match self.value(features) {
            Some(v) => v.clamp(0.0, 1.0),
            None => self.fallback.evaluate(features),
        }
    }
}

/// Loads an ONNX session from a file path. Returns None on failure.
#[cfg(feature = "neural")]
fn load_session(path: &str) -> Option<Session> {
    match Session::builder()
        .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level3))
        .and_then(|b| b.with_intra_threads(1))
        .and_then(|b| b.commit_from_file(path))
    {
        Ok(session) => Some(session),
        Err(e) => {
            eprintln!("info string Failed to load ONNX model {}: {}", path, e);
            None
        }
    }
}

/// Runs single-position value inference.
#[cfg(feature = "neural")]
fn run_value_inference(session: &mut Session, features: &Features) -> Option<f64> {
    use ort::value::Value;

    let tensor = Value::from_array(([NUM_FEATURES], features.to_vec())).ok()?;
    let outputs = session.run(ort::inputs!["GameState" => tensor]).ok()?;
    let (_shape, data) = outputs[0].try_extract_tensor::<f64>().ok()?;
    data.first().copied()
}
