//! Feature vector layout and z-score normalization.
//!
//! The 21-element layout defined here is load-bearing: the
//! normalization constants, the classifier input, and the named fields
//! of persisted session records all use the same fixed positions. The
//! [`index`] module is the single source of truth for those positions.

use serde::{Deserialize, Serialize};

/// Number of features produced by extraction.
pub const FEATURE_COUNT: usize = 21;

/// Per-feature means fitted offline on the training set, in vector
/// order. Changing these invalidates the trained decision boundary.
pub const FEATURE_MEANS: [f64; FEATURE_COUNT] = [
    2.16451445e-03,
    4.34967010e-03,
    6.17531195e-04,
    7.76659989e-01,
    8.90769845e-01,
    7.51154485e-01,
    -4.49073831e-05,
    4.78739464e-04,
    1.99448259e-03,
    5.53282868e-01,
    6.29934365e-01,
    4.74331566e-01,
    7.80763320e+00,
    7.77254842e+00,
    7.70679030e+00,
    7.73052468e+00,
    7.77779237e+00,
    7.74355218e+00,
    6.38417917e-01,
    5.87826023e-01,
    6.62068710e-01,
];

/// Per-feature standard deviations fitted offline on the training set,
/// in vector order.
pub const FEATURE_STDS: [f64; FEATURE_COUNT] = [
    0.09279512,
    0.12847095,
    0.09247015,
    0.41559714,
    0.49850243,
    0.45241221,
    0.04470217,
    0.04561358,
    0.04507193,
    0.34681894,
    0.36963002,
    0.31590781,
    2.55606792,
    2.48898691,
    2.48891113,
    2.50131653,
    2.51043773,
    2.47561772,
    0.2045824,
    0.25516114,
    0.19698866,
];

/// Fixed position of each feature within the 21-element vector.
///
/// Raw computation, the normalization constant arrays, and the session
/// record field mapping all follow this one order. A transposition in
/// any consumer silently corrupts every downstream record, so consumers
/// index through these constants rather than bare literals.
pub mod index {
    /// Accelerometer X-axis mean.
    pub const ACCEL_X_MEAN: usize = 0;
    /// Accelerometer Y-axis mean.
    pub const ACCEL_Y_MEAN: usize = 1;
    /// Accelerometer Z-axis mean.
    pub const ACCEL_Z_MEAN: usize = 2;
    /// Accelerometer X-axis standard deviation.
    pub const ACCEL_X_STD: usize = 3;
    /// Accelerometer Y-axis standard deviation.
    pub const ACCEL_Y_STD: usize = 4;
    /// Accelerometer Z-axis standard deviation.
    pub const ACCEL_Z_STD: usize = 5;
    /// Gyroscope X-axis mean.
    pub const GYRO_X_MEAN: usize = 6;
    /// Gyroscope Y-axis mean.
    pub const GYRO_Y_MEAN: usize = 7;
    /// Gyroscope Z-axis mean.
    pub const GYRO_Z_MEAN: usize = 8;
    /// Gyroscope X-axis standard deviation.
    pub const GYRO_X_STD: usize = 9;
    /// Gyroscope Y-axis standard deviation.
    pub const GYRO_Y_STD: usize = 10;
    /// Gyroscope Z-axis standard deviation.
    pub const GYRO_Z_STD: usize = 11;
    /// Accelerometer X-axis FFT peak magnitude.
    pub const ACCEL_X_FFT_PEAK: usize = 12;
    /// Accelerometer Y-axis FFT peak magnitude.
    pub const ACCEL_Y_FFT_PEAK: usize = 13;
    /// Accelerometer Z-axis FFT peak magnitude.
    pub const ACCEL_Z_FFT_PEAK: usize = 14;
    /// Gyroscope X-axis FFT peak magnitude.
    pub const GYRO_X_FFT_PEAK: usize = 15;
    /// Gyroscope Y-axis FFT peak magnitude.
    pub const GYRO_Y_FFT_PEAK: usize = 16;
    /// Gyroscope Z-axis FFT peak magnitude.
    pub const GYRO_Z_FFT_PEAK: usize = 17;
    /// Accelerometer/gyroscope X-axis cross-correlation.
    pub const CROSS_CORR_X: usize = 18;
    /// Accelerometer/gyroscope Y-axis cross-correlation.
    pub const CROSS_CORR_Y: usize = 19;
    /// Accelerometer/gyroscope Z-axis cross-correlation.
    pub const CROSS_CORR_Z: usize = 20;
}

/// Normalized 21-feature vector, produced atomically from one buffer
/// snapshot and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Wraps an already-normalized array of feature values.
    #[must_use]
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    /// Feature values in vector order.
    #[must_use]
    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    /// Feature values as a slice, for consumers taking arbitrary-length
    /// input.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// True when every feature value is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

/// Standardizes raw features against the training constants.
///
/// Each value becomes `(raw - mean) / std`; a feature whose training
/// standard deviation is zero maps to 0.0 instead of dividing by zero.
/// This must reproduce the training-time transform exactly or the
/// classifier's decision boundary no longer applies.
#[must_use]
pub fn normalize(raw: &[f64; FEATURE_COUNT]) -> FeatureVector {
    let mut out = [0.0; FEATURE_COUNT];
    for i in 0..FEATURE_COUNT {
        out[i] = if FEATURE_STDS[i] == 0.0 {
            0.0
        } else {
            (raw[i] - FEATURE_MEANS[i]) / FEATURE_STDS[i]
        };
    }
    FeatureVector::new(out)
}
