//! Anomaly classifier with an explicit lifecycle.
//!
//! [`AnomalyClassifier`] owns an optional [`InferenceBackend`] behind a
//! mutex. It starts unloaded, is initialized exactly once with an
//! injected backend (or a network loaded from an artifact file), serves
//! predictions one at a time while loaded, and can be shut down and
//! re-initialized. Callers that predict before initialization get
//! [`ModelError::NotInitialized`] instead of a partially-working model.

use std::fmt;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::backend::InferenceBackend;
use crate::dense::DenseNetwork;
use crate::{ModelError, Result, FEATURE_COUNT};

/// Scores at or above this value are labelled as suspected anomalies.
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Binary outcome of a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionLabel {
    /// Score below [`DECISION_THRESHOLD`].
    Negative,
    /// Score at or above [`DECISION_THRESHOLD`].
    Suspected,
}

impl PredictionLabel {
    /// Maps a raw score to a label. The threshold itself counts as
    /// suspected.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= DECISION_THRESHOLD {
            Self::Suspected
        } else {
            Self::Negative
        }
    }

    /// Numeric form stored on session records: 0 negative, 1 suspected.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        match self {
            Self::Negative => 0,
            Self::Suspected => 1,
        }
    }

    /// Human-readable label shown alongside a session.
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::Negative => "No anomaly",
            Self::Suspected => "Suspected anomaly",
        }
    }
}

/// Outcome of one classification: the thresholded label plus the raw
/// score it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Thresholded outcome.
    pub label: PredictionLabel,
    /// Raw backend score before thresholding.
    pub score: f64,
}

/// Thread-safe classifier wrapping an interchangeable inference backend.
///
/// The backend slot is guarded by a mutex, which both protects the
/// load/shutdown lifecycle and serializes concurrent predictions.
pub struct AnomalyClassifier {
    backend: Mutex<Option<Box<dyn InferenceBackend>>>,
}

impl AnomalyClassifier {
    /// Creates an unloaded classifier. Predictions fail with
    /// [`ModelError::NotInitialized`] until a backend is installed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            backend: Mutex::new(None),
        }
    }

    /// Creates a classifier that is ready immediately, for dependency
    /// injection in tests and embedders that construct the backend
    /// themselves.
    #[must_use]
    pub fn with_backend(backend: Box<dyn InferenceBackend>) -> Self {
        Self {
            backend: Mutex::new(Some(backend)),
        }
    }

    /// Installs a backend into an unloaded classifier.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::AlreadyInitialized`] if a backend is
    /// already installed, and [`ModelError::InvalidArtifact`] if the
    /// backend does not accept [`FEATURE_COUNT`] inputs.
    pub fn initialize(&self, backend: Box<dyn InferenceBackend>) -> Result<()> {
        let mut slot = self.backend.lock();
        if slot.is_some() {
            return Err(ModelError::AlreadyInitialized);
        }
        if backend.input_len() != FEATURE_COUNT {
            return Err(ModelError::InvalidArtifact {
                message: format!(
                    "backend expects {} inputs, classifier requires {FEATURE_COUNT}",
                    backend.input_len()
                ),
            });
        }
        info!(backend = backend.name(), "classifier initialized");
        *slot = Some(backend);
        Ok(())
    }

    /// Loads a [`DenseNetwork`] artifact from disk and installs it.
    ///
    /// # Errors
    ///
    /// Propagates artifact errors from [`DenseNetwork::from_path`] and
    /// lifecycle errors from [`Self::initialize`].
    pub fn load_artifact<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let network = DenseNetwork::from_path(path)?;
        self.initialize(Box::new(network))
    }

    /// Whether a backend is currently installed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.backend.lock().is_some()
    }

    /// Removes the backend, releasing its resources. Idempotent; a
    /// shut-down classifier can be initialized again.
    pub fn shutdown(&self) {
        if let Some(backend) = self.backend.lock().take() {
            info!(backend = backend.name(), "classifier shut down");
        }
    }

    /// Classifies one normalized feature vector.
    ///
    /// Predictions are serialized: the backend is never invoked from
    /// two threads at once.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::ShapeMismatch`] if `features` does not
    /// hold exactly [`FEATURE_COUNT`] values, [`ModelError::NotInitialized`]
    /// if no backend is installed, and propagates backend failures.
    pub fn predict(&self, features: &[f64]) -> Result<Prediction> {
        if features.len() != FEATURE_COUNT {
            return Err(ModelError::ShapeMismatch {
                expected: FEATURE_COUNT,
                actual: features.len(),
            });
        }

        let slot = self.backend.lock();
        let backend = slot.as_ref().ok_or(ModelError::NotInitialized)?;
        let score = backend.infer(features)?;
        let label = PredictionLabel::from_score(score);
        debug!(score, label = label.text(), "classified feature vector");
        Ok(Prediction { label, score })
    }
}

impl Default for AnomalyClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AnomalyClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.backend.lock();
        f.debug_struct("AnomalyClassifier")
            .field("ready", &slot.is_some())
            .field(
                "backend",
                &slot.as_ref().map(|backend| backend.name().to_string()),
            )
            .finish()
    }
}
