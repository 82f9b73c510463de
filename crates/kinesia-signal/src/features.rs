//! Statistical and spectral feature computation.
//!
//! Extraction reduces a gated [`SampleBuffer`] snapshot to 21 raw
//! features and standardizes them against the training constants:
//! per-axis mean, population standard deviation and FFT peak magnitude
//! for each sensor, plus one accelerometer/gyroscope Pearson
//! correlation per axis. Extraction is a pure function of the buffer
//! contents; the same unmutated buffer always yields a bit-identical
//! vector.

use num_complex::Complex64;
use rustfft::FftPlanner;
use tracing::debug;

use crate::buffer::{Axis, SampleBuffer, SensorKind, MIN_SAMPLES};
use crate::normalize::{self, index, FeatureVector, FEATURE_COUNT};
use crate::{Result, SignalError};

/// Arithmetic mean of a series. Empty input yields 0.0.
#[must_use]
pub fn mean(series: &[f64]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    series.iter().sum::<f64>() / series.len() as f64
}

/// Population standard deviation around a precomputed mean.
///
/// Divides by N, not N-1, matching the convention the normalization
/// constants were fitted with. Empty input yields 0.0.
#[must_use]
pub fn population_std(series: &[f64], mean: f64) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    let sum_squared_diff: f64 = series
        .iter()
        .map(|value| {
            let diff = value - mean;
            diff * diff
        })
        .sum();
    (sum_squared_diff / series.len() as f64).sqrt()
}

/// Maximum DFT magnitude of a series, excluding the DC bin and the
/// mirror half of the spectrum.
///
/// The series is zero-padded at the tail to the next power of two (no
/// padding when the length already is one), transformed with the
/// standard unnormalized forward DFT, and scanned over bins
/// `1..padded_len / 2`. Returns 0.0 when the scan range is empty or the
/// signal carries no off-DC energy.
#[must_use]
pub fn fft_peak_magnitude(series: &[f64]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }

    let padded_len = series.len().next_power_of_two();
    let mut spectrum: Vec<Complex64> = series
        .iter()
        .map(|&value| Complex64::new(value, 0.0))
        .collect();
    spectrum.resize(padded_len, Complex64::new(0.0, 0.0));

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(padded_len);
    fft.process(&mut spectrum);

    let mut max_magnitude = 0.0_f64;
    for bin in spectrum.iter().take(padded_len / 2).skip(1) {
        let magnitude = bin.norm();
        if magnitude > max_magnitude {
            max_magnitude = magnitude;
        }
    }
    max_magnitude
}

/// Pearson correlation coefficient between two series, truncated to the
/// shorter length.
///
/// Degenerate inputs (zero variance in either series, or fewer than two
/// overlapping samples) produce 0.0 rather than an error; a flat sensor
/// axis is defined behavior, not a failure.
#[must_use]
pub fn cross_correlation(first: &[f64], second: &[f64]) -> f64 {
    let n = first.len().min(second.len());
    if n == 0 {
        return 0.0;
    }
    let a = &first[..n];
    let b = &second[..n];

    let mean_a = mean(a);
    let mean_b = mean(b);

    let mut covariance = 0.0;
    let mut variance_a = 0.0;
    let mut variance_b = 0.0;
    for i in 0..n {
        let da = a[i] - mean_a;
        let db = b[i] - mean_b;
        covariance += da * db;
        variance_a += da * da;
        variance_b += db * db;
    }

    let correlation = covariance / (variance_a.sqrt() * variance_b.sqrt());
    if correlation.is_finite() {
        correlation
    } else {
        debug!("zero-variance series in cross-correlation, substituting 0.0");
        0.0
    }
}

/// Computes the 21 raw (un-normalized) features from a buffer snapshot.
///
/// Vector layout: accelerometer means, accelerometer stds, gyroscope
/// means, gyroscope stds, accelerometer FFT peaks, gyroscope FFT peaks,
/// cross-correlations; X, Y, Z within each group (see
/// [`normalize::index`]).
///
/// # Errors
///
/// Returns [`SignalError::InsufficientData`] when either channel holds
/// fewer than [`MIN_SAMPLES`] samples. A partial vector is never
/// produced.
pub fn extract_raw_features(buffer: &SampleBuffer) -> Result<[f64; FEATURE_COUNT]> {
    let accel_len = buffer.len(SensorKind::Accelerometer);
    let gyro_len = buffer.len(SensorKind::Gyroscope);
    if !buffer.has_enough_data() {
        return Err(SignalError::InsufficientData {
            required: MIN_SAMPLES,
            accel: accel_len,
            gyro: gyro_len,
        });
    }
    debug!(accel = accel_len, gyro = gyro_len, "extracting feature vector");

    let accel = Axis::ALL.map(|axis| buffer.axis_values(SensorKind::Accelerometer, axis));
    let gyro = Axis::ALL.map(|axis| buffer.axis_values(SensorKind::Gyroscope, axis));

    let mut raw = [0.0; FEATURE_COUNT];
    for (i, series) in accel.iter().enumerate() {
        let series_mean = mean(series);
        raw[index::ACCEL_X_MEAN + i] = series_mean;
        raw[index::ACCEL_X_STD + i] = population_std(series, series_mean);
        raw[index::ACCEL_X_FFT_PEAK + i] = fft_peak_magnitude(series);
    }
    for (i, series) in gyro.iter().enumerate() {
        let series_mean = mean(series);
        raw[index::GYRO_X_MEAN + i] = series_mean;
        raw[index::GYRO_X_STD + i] = population_std(series, series_mean);
        raw[index::GYRO_X_FFT_PEAK + i] = fft_peak_magnitude(series);
    }
    for i in 0..3 {
        raw[index::CROSS_CORR_X + i] = cross_correlation(&accel[i], &gyro[i]);
    }

    Ok(raw)
}

/// Extracts and normalizes the 21-feature vector from a buffer
/// snapshot.
///
/// # Errors
///
/// Returns [`SignalError::InsufficientData`] when either channel is
/// below the minimum sample threshold.
pub fn extract_features(buffer: &SampleBuffer) -> Result<FeatureVector> {
    let raw = extract_raw_features(buffer)?;
    Ok(normalize::normalize(&raw))
}
