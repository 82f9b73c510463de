//! Inference backend abstraction.
//!
//! The classifier talks to its model exclusively through
//! [`InferenceBackend`], so the pre-trained network can be swapped for
//! a scripted double in tests or a different runtime in embedders
//! without touching classification logic.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::{ModelError, Result, FEATURE_COUNT};

/// A loaded model capable of scoring one feature vector at a time.
///
/// Implementations must be safe to share across threads; the
/// classifier serializes calls to [`infer`](Self::infer) itself.
pub trait InferenceBackend: Send + Sync {
    /// Short backend name used in logs.
    fn name(&self) -> &str;

    /// Number of input features the backend expects.
    fn input_len(&self) -> usize;

    /// Scores a feature vector, returning the raw model output.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::ShapeMismatch`] when `features` does not
    /// match [`input_len`](Self::input_len), and
    /// [`ModelError::Inference`] for runtime failures.
    fn infer(&self, features: &[f64]) -> Result<f64>;
}

/// Scripted backend for tests: returns a fixed score and counts calls.
///
/// Clones share the call counter, so a test can keep a handle while
/// the original is moved into a classifier.
#[derive(Debug, Clone)]
pub struct MockBackend {
    score: f64,
    input_len: usize,
    calls: Arc<AtomicUsize>,
}

impl MockBackend {
    /// Creates a mock that accepts [`FEATURE_COUNT`] inputs and always
    /// returns `score`.
    #[must_use]
    pub fn returning(score: f64) -> Self {
        Self {
            score,
            input_len: FEATURE_COUNT,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Overrides the accepted input width, for exercising shape errors.
    #[must_use]
    pub fn with_input_len(mut self, input_len: usize) -> Self {
        self.input_len = input_len;
        self
    }

    /// Number of successful [`infer`](InferenceBackend::infer) calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl InferenceBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    fn input_len(&self) -> usize {
        self.input_len
    }

    fn infer(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.input_len {
            return Err(ModelError::ShapeMismatch {
                expected: self.input_len,
                actual: features.len(),
            });
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.score)
    }
}
