//! # Kinesia Session
//!
//! Recording session orchestration for the Kinesia anomaly detection
//! pipeline. This crate connects the signal layer to the classifier:
//! a [`SessionRecorder`] accepts raw sensor samples through an
//! explicit state machine, drains them into a classified
//! [`SessionRecord`], and hands completed records to whatever
//! [`SessionRepository`] the embedder provides.
//!
//! ## Features
//!
//! - **Single-writer state machine**: samples, stop and finish cannot
//!   interleave incorrectly even with a sensor thread and a UI thread
//!   driving the same recorder
//! - **Flattened records**: every extracted feature becomes a named,
//!   camelCase-serialized field ready for the sync service
//! - **Storage behind a trait**: persistence is injected, with an
//!   in-memory implementation bundled for tests
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use kinesia_model::{AnomalyClassifier, MockBackend};
//! use kinesia_session::{SensorKind, SessionRecorder};
//!
//! let classifier = Arc::new(AnomalyClassifier::with_backend(Box::new(
//!     MockBackend::returning(0.82),
//! )));
//! let recorder = SessionRecorder::new(classifier);
//!
//! recorder.start()?;
//! for i in 0..60 {
//!     let t = i as f64 * 0.02;
//!     recorder.record_sample(SensorKind::Accelerometer, t.sin(), t.cos(), 9.81)?;
//!     recorder.record_sample(SensorKind::Gyroscope, 0.2 * t.sin(), 0.1, 0.0)?;
//! }
//! recorder.stop()?;
//!
//! let record = recorder.finish()?;
//! assert_eq!(record.prediction, 1);
//! assert_eq!(record.prediction_text, "Suspected anomaly");
//! # Ok::<(), kinesia_session::SessionError>(())
//! ```

#![warn(missing_docs)]

pub mod record;
pub mod recorder;
pub mod store;

pub use record::SessionRecord;
pub use recorder::{RecorderConfig, RecorderState, RecorderStats, SessionRecorder};
pub use store::{InMemoryRepository, SessionRepository};

// Re-exported so embedders can feed samples without depending on the
// signal crate directly.
pub use kinesia_signal::SensorKind;

use kinesia_model::ModelError;
use kinesia_signal::SignalError;
use thiserror::Error;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors raised while driving a recording session.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SessionError {
    /// Feature extraction failed.
    #[error("signal error: {0}")]
    Signal(#[from] SignalError),

    /// Classification failed.
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// An operation was called in the wrong recorder phase.
    #[error("invalid recorder state: expected {expected}, was {actual}")]
    InvalidState {
        /// Phase the operation requires.
        expected: &'static str,
        /// Phase the recorder was actually in.
        actual: &'static str,
    },

    /// The storage backend failed.
    #[error("repository error: {message}")]
    Repository {
        /// Backend-reported failure.
        message: String,
    },
}

impl SessionError {
    /// Whether retrying can succeed without fixing calling code.
    ///
    /// Signal and model errors delegate to their own classification.
    /// Out-of-phase calls are ordering bugs in the caller; storage
    /// failures are treated as transient.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Signal(err) => err.is_recoverable(),
            Self::Model(err) => err.is_recoverable(),
            Self::InvalidState { .. } => false,
            Self::Repository { .. } => true,
        }
    }
}

/// Commonly used types, importable in one line.
pub mod prelude {
    pub use crate::record::SessionRecord;
    pub use crate::recorder::{RecorderConfig, RecorderState, RecorderStats, SessionRecorder};
    pub use crate::store::{InMemoryRepository, SessionRepository};
    pub use crate::{Result, SessionError, VERSION};
    pub use kinesia_signal::SensorKind;
}
