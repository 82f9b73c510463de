//! Kinesia Signal Processing Library
//!
//! This crate turns raw dual-sensor motion recordings into the fixed
//! 21-feature vectors consumed by the anomaly classifier. It covers
//! sample buffering, statistical and spectral feature computation, and
//! z-score normalization against fixed training statistics.
//!
//! # Features
//!
//! - **Sample Buffering**: dual-channel (accelerometer, gyroscope)
//!   append-only buffers with a minimum-sample extraction gate
//! - **Feature Extraction**: per-axis mean, population standard
//!   deviation and FFT peak magnitude, plus cross-sensor Pearson
//!   correlations
//! - **Normalization**: z-scoring against constants fitted offline on
//!   the training set
//!
//! # Example
//!
//! ```rust
//! use kinesia_signal::{extract_features, SampleBuffer, SensorKind};
//!
//! let mut buffer = SampleBuffer::new();
//! for i in 0..60 {
//!     let t = i as f64 * 0.02;
//!     buffer.push(SensorKind::Accelerometer, t.sin(), t.cos(), 9.81);
//!     buffer.push(SensorKind::Gyroscope, 0.3 * t.cos(), 0.1 * t.sin(), 0.0);
//! }
//!
//! let vector = extract_features(&buffer).unwrap();
//! assert_eq!(vector.values().len(), 21);
//! assert!(vector.is_finite());
//! ```

#![warn(missing_docs)]

pub mod buffer;
pub mod features;
pub mod normalize;

// Re-export main types for convenience
pub use buffer::{Axis, SampleBuffer, SensorKind, MIN_SAMPLES};
pub use features::{
    cross_correlation, extract_features, extract_raw_features, fft_peak_magnitude, mean,
    population_std,
};
pub use normalize::{index, normalize, FeatureVector, FEATURE_COUNT, FEATURE_MEANS, FEATURE_STDS};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common result type for signal operations
pub type Result<T> = std::result::Result<T, SignalError>;

/// Errors produced by the signal layer.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SignalError {
    /// Feature extraction was attempted before both channels reached
    /// the minimum sample count.
    #[error(
        "insufficient data: need {required} samples per channel, have {accel} accelerometer and {gyro} gyroscope"
    )]
    InsufficientData {
        /// Minimum samples required in each channel.
        required: usize,
        /// Samples buffered in the accelerometer channel.
        accel: usize,
        /// Samples buffered in the gyroscope channel.
        gyro: usize,
    },
}

impl SignalError {
    /// Returns `true` if this error is recoverable by the caller.
    ///
    /// Insufficient data is recovered by continuing to record.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::InsufficientData { .. } => true,
        }
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::buffer::{Axis, SampleBuffer, SensorKind, MIN_SAMPLES};
    pub use crate::features::{extract_features, extract_raw_features};
    pub use crate::normalize::{FeatureVector, FEATURE_COUNT};
    pub use crate::{Result, SignalError};
}
