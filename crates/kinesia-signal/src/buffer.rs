//! Dual-channel buffering of raw motion samples.
//!
//! A [`SampleBuffer`] holds one insertion-ordered sequence of 3-axis
//! readings per sensor channel. The buffer performs no validation or
//! conversion of sensor values; it only accumulates what the sensor
//! source delivers and gates feature extraction on the minimum sample
//! count.

use serde::{Deserialize, Serialize};

/// Minimum number of samples required in each channel before feature
/// extraction is allowed. Corresponds to roughly one second of data at
/// the nominal 50 Hz sensor rate.
pub const MIN_SAMPLES: usize = 50;

/// Identifies the sensor that produced a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    /// Linear acceleration sensor, values in m/s².
    Accelerometer,
    /// Rotation rate sensor, values in rad/s.
    Gyroscope,
}

impl SensorKind {
    /// Short lowercase name, used in log fields.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Accelerometer => "accelerometer",
            Self::Gyroscope => "gyroscope",
        }
    }
}

/// One spatial axis of a 3-axis sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// First component of a sample triple.
    X,
    /// Second component.
    Y,
    /// Third component.
    Z,
}

impl Axis {
    /// All axes in component order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Index of this axis within a sample triple.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

/// Append-only buffer of 3-axis samples, one ordered sequence per
/// sensor channel.
///
/// Both sequences are cleared together at the start of a recording and
/// consumed together when the recording stops. The buffer itself does
/// not guard against mixing recordings; the recording orchestration is
/// responsible for calling [`SampleBuffer::clear`] before reuse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SampleBuffer {
    accel: Vec<[f64; 3]>,
    gyro: Vec<[f64; 3]>,
}

impl SampleBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one sample to the sequence for `kind`.
    ///
    /// Any finite values are accepted; no range checks are applied.
    pub fn push(&mut self, kind: SensorKind, x: f64, y: f64, z: f64) {
        let sample = [x, y, z];
        match kind {
            SensorKind::Accelerometer => self.accel.push(sample),
            SensorKind::Gyroscope => self.gyro.push(sample),
        }
    }

    /// Empties both channel sequences.
    pub fn clear(&mut self) {
        self.accel.clear();
        self.gyro.clear();
    }

    /// Number of samples buffered for `kind`.
    #[must_use]
    pub fn len(&self, kind: SensorKind) -> usize {
        match kind {
            SensorKind::Accelerometer => self.accel.len(),
            SensorKind::Gyroscope => self.gyro.len(),
        }
    }

    /// True when both channels are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accel.is_empty() && self.gyro.is_empty()
    }

    /// True when both channels hold at least [`MIN_SAMPLES`] samples.
    ///
    /// This is the sole gating check before feature extraction: either
    /// channel below the threshold means extraction must fail rather
    /// than produce a vector from too little data.
    #[must_use]
    pub fn has_enough_data(&self) -> bool {
        self.accel.len() >= MIN_SAMPLES && self.gyro.len() >= MIN_SAMPLES
    }

    /// Buffered samples for `kind`, in insertion order.
    #[must_use]
    pub fn samples(&self, kind: SensorKind) -> &[[f64; 3]] {
        match kind {
            SensorKind::Accelerometer => &self.accel,
            SensorKind::Gyroscope => &self.gyro,
        }
    }

    /// Extracts one axis of one channel as a contiguous series, in
    /// insertion order.
    #[must_use]
    pub fn axis_values(&self, kind: SensorKind, axis: Axis) -> Vec<f64> {
        let idx = axis.index();
        self.samples(kind).iter().map(|s| s[idx]).collect()
    }
}
