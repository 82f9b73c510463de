//! # Kinesia Model
//!
//! Anomaly classification for movement-disorder screening. This crate
//! wraps a pre-trained scoring model behind an explicit lifecycle:
//! construct, initialize once, predict, shut down. The model itself is
//! interchangeable through the [`InferenceBackend`] trait, with a
//! bundled [`DenseNetwork`] implementation loaded from a JSON artifact
//! and a [`MockBackend`] for tests.
//!
//! ## Features
//!
//! - **Explicit lifecycle**: an uninitialized classifier refuses to
//!   predict instead of serving garbage, and can be re-initialized
//!   after shutdown
//! - **Pluggable inference**: backends are injected, so tests script
//!   scores without any model file on disk
//! - **Validated artifacts**: network dimensions and weights are
//!   checked at load time, and a broken artifact keeps the classifier
//!   unloaded
//!
//! ## Example
//!
//! ```
//! use kinesia_model::{AnomalyClassifier, MockBackend, FEATURE_COUNT};
//!
//! let classifier = AnomalyClassifier::with_backend(Box::new(MockBackend::returning(0.82)));
//! let prediction = classifier.predict(&[0.0; FEATURE_COUNT])?;
//! assert_eq!(prediction.label.as_i32(), 1);
//! assert_eq!(prediction.label.text(), "Suspected anomaly");
//! # Ok::<(), kinesia_model::ModelError>(())
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod backend;
pub mod classifier;
pub mod dense;

pub use backend::{InferenceBackend, MockBackend};
pub use classifier::{AnomalyClassifier, Prediction, PredictionLabel, DECISION_THRESHOLD};
pub use dense::{Activation, DenseLayer, DenseNetwork};

use thiserror::Error;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of features every classifier input must hold.
pub const FEATURE_COUNT: usize = 21;

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors raised by model loading and classification.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ModelError {
    /// A feature vector of the wrong length reached the model. This is
    /// a caller bug, not a runtime condition.
    #[error("feature vector has {actual} values, model expects {expected}")]
    ShapeMismatch {
        /// Input width the model requires.
        expected: usize,
        /// Length the caller actually supplied.
        actual: usize,
    },

    /// The artifact file could not be read.
    #[error("failed to load model artifact from {path}: {reason}")]
    LoadFailed {
        /// Path that was attempted.
        path: String,
        /// Underlying I/O failure.
        reason: String,
    },

    /// The artifact was read but does not describe a servable network.
    #[error("invalid model artifact: {message}")]
    InvalidArtifact {
        /// First inconsistency found.
        message: String,
    },

    /// Prediction was requested before a backend was installed.
    #[error("classifier is not initialized")]
    NotInitialized,

    /// A second backend was installed without shutting down first.
    #[error("classifier is already initialized")]
    AlreadyInitialized,

    /// The backend failed while scoring.
    #[error("inference failed: {message}")]
    Inference {
        /// Backend-reported failure.
        message: String,
    },
}

impl ModelError {
    /// Whether retrying can succeed without fixing code or the
    /// artifact. Initializing the classifier cures [`NotInitialized`];
    /// transient backend failures may clear on their own. Shape and
    /// artifact errors will recur unchanged.
    ///
    /// [`NotInitialized`]: ModelError::NotInitialized
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotInitialized | Self::Inference { .. })
    }
}

/// Commonly used types, importable in one line.
pub mod prelude {
    pub use crate::backend::{InferenceBackend, MockBackend};
    pub use crate::classifier::{
        AnomalyClassifier, Prediction, PredictionLabel, DECISION_THRESHOLD,
    };
    pub use crate::dense::DenseNetwork;
    pub use crate::{ModelError, Result, FEATURE_COUNT, VERSION};
}
