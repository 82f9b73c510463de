//! Validation tests proving the numerical behavior of the extraction
//! pipeline against known mathematical results.

use std::f64::consts::PI;

use kinesia_signal::{
    extract_features, extract_raw_features, fft_peak_magnitude, index, SampleBuffer, SensorKind,
    FEATURE_COUNT, FEATURE_MEANS, FEATURE_STDS, MIN_SAMPLES,
};

/// Validate classic DFT scaling: a pure tone on an exact bin has peak
/// magnitude amplitude * N / 2.
#[test]
fn validate_dft_peak_scaling() {
    for &(n, cycles, amplitude) in &[(64usize, 8.0, 2.0), (128, 8.0, 2.0), (256, 16.0, 1.5)] {
        let tone = sinusoid(n, cycles, amplitude, 0.0);
        let peak = fft_peak_magnitude(&tone);
        let expected = amplitude * n as f64 / 2.0;

        println!("n={n} cycles={cycles}: peak={peak:.6}, expected={expected:.6}");
        assert!(
            (peak - expected).abs() < 1e-6,
            "DFT scaling violated: expected {expected}, got {peak}"
        );
    }

    // Doubling N at fixed amplitude doubles the peak.
    let short = fft_peak_magnitude(&sinusoid(64, 8.0, 2.0, 0.0));
    let long = fft_peak_magnitude(&sinusoid(128, 8.0, 2.0, 0.0));
    assert!(
        (long / short - 2.0).abs() < 1e-9,
        "peak must scale linearly with N: {short} -> {long}"
    );
}

/// Validate that zero-padding to the next power of two matches an input
/// that already carries the trailing zeros explicitly.
#[test]
fn validate_fft_padding_invariance() {
    let base = sinusoid(50, 4.0, 1.0, 0.3);

    let mut pre_padded = base.clone();
    pre_padded.resize(64, 0.0);

    let implicit = fft_peak_magnitude(&base);
    let explicit = fft_peak_magnitude(&pre_padded);

    println!("implicit pad: {implicit:.9}, explicit pad: {explicit:.9}");
    assert!(
        (implicit - explicit).abs() < 1e-9,
        "padding path diverged: {implicit} vs {explicit}"
    );

    // A power-of-two input must take the no-padding path: an exact-bin
    // tone only reaches amplitude * N / 2 when the length is untouched.
    let exact = sinusoid(64, 4.0, 1.0, 0.0);
    let peak = fft_peak_magnitude(&exact);
    assert!(
        (peak - 32.0).abs() < 1e-6,
        "length-64 input was padded or rescaled: peak {peak}"
    );
}

/// Validate the full normalized vector on a constant recording, where
/// every raw feature is known in closed form.
#[test]
fn validate_normalization_ground_truth() {
    let buffer = constant_buffer([1.0, 2.0, 3.0], [4.0, 5.0, 6.0], MIN_SAMPLES);

    // Constant channels: means are the constants, stds are zero, all
    // off-DC spectral energy is zero and every correlation degenerates
    // to the 0.0 fallback.
    let mut expected_raw = [0.0_f64; FEATURE_COUNT];
    expected_raw[index::ACCEL_X_MEAN] = 1.0;
    expected_raw[index::ACCEL_Y_MEAN] = 2.0;
    expected_raw[index::ACCEL_Z_MEAN] = 3.0;
    expected_raw[index::GYRO_X_MEAN] = 4.0;
    expected_raw[index::GYRO_Y_MEAN] = 5.0;
    expected_raw[index::GYRO_Z_MEAN] = 6.0;

    let raw = extract_raw_features(&buffer).unwrap();
    for i in 0..FEATURE_COUNT {
        assert!(
            (raw[i] - expected_raw[i]).abs() < 1e-9,
            "raw[{i}]: expected {}, got {}",
            expected_raw[i],
            raw[i]
        );
    }

    let vector = extract_features(&buffer).unwrap();
    let values = vector.values();
    for i in 0..FEATURE_COUNT {
        let expected = (expected_raw[i] - FEATURE_MEANS[i]) / FEATURE_STDS[i];
        assert!(
            (values[i] - expected).abs() < 1e-9,
            "normalized[{i}]: expected {expected}, got {}",
            values[i]
        );
    }

    println!("ground truth validated for all {FEATURE_COUNT} positions");
}

/// Validate an end-to-end sinusoid recording: spectral peaks land where
/// DFT scaling predicts and per-axis correlations reflect the phase
/// relationships between the two sensors.
#[test]
fn validate_sinusoid_end_to_end() {
    let n = 64;
    let accel_x = sinusoid(n, 8.0, 2.0, 0.0);
    let accel_y = sinusoid(n, 4.0, 1.0, 0.0);
    let accel_z = sinusoid(n, 2.0, 0.5, 0.0);
    // X: same phase as accel (correlation 1), Y: quadrature
    // (correlation 0), Z: opposite sign (correlation -1).
    let gyro_x = sinusoid(n, 8.0, 0.7, 0.0);
    let gyro_y = sinusoid(n, 4.0, 1.0, PI / 2.0);
    let gyro_z: Vec<f64> = accel_z.iter().map(|v| -v).collect();

    let mut buffer = SampleBuffer::new();
    for i in 0..n {
        buffer.push(SensorKind::Accelerometer, accel_x[i], accel_y[i], accel_z[i]);
        buffer.push(SensorKind::Gyroscope, gyro_x[i], gyro_y[i], gyro_z[i]);
    }

    let raw = extract_raw_features(&buffer).unwrap();

    let expected_peak_x = 2.0 * n as f64 / 2.0;
    println!(
        "accel X peak: {:.6} (expected {expected_peak_x:.6})",
        raw[index::ACCEL_X_FFT_PEAK]
    );
    assert!((raw[index::ACCEL_X_FFT_PEAK] - expected_peak_x).abs() < 1e-6);
    assert!((raw[index::ACCEL_Y_FFT_PEAK] - n as f64 / 2.0).abs() < 1e-6);
    assert!((raw[index::GYRO_X_FFT_PEAK] - 0.7 * n as f64 / 2.0).abs() < 1e-6);

    println!(
        "correlations: x={:.6}, y={:.6}, z={:.6}",
        raw[index::CROSS_CORR_X],
        raw[index::CROSS_CORR_Y],
        raw[index::CROSS_CORR_Z]
    );
    assert!((raw[index::CROSS_CORR_X] - 1.0).abs() < 1e-6, "in-phase axes");
    assert!(raw[index::CROSS_CORR_Y].abs() < 1e-6, "quadrature axes");
    assert!((raw[index::CROSS_CORR_Z] + 1.0).abs() < 1e-6, "opposed axes");

    // Full-period sinusoids have zero mean.
    assert!(raw[index::ACCEL_X_MEAN].abs() < 1e-9);
    assert!(raw[index::GYRO_Z_MEAN].abs() < 1e-9);
}

/// Validate the public extraction gate at the 49/50 sample boundary.
#[test]
fn validate_minimum_sample_gate() {
    let buffer = constant_buffer([0.1, 0.2, 0.3], [0.4, 0.5, 0.6], MIN_SAMPLES - 1);
    assert!(extract_features(&buffer).is_err(), "49 per channel must fail");

    let buffer = constant_buffer([0.1, 0.2, 0.3], [0.4, 0.5, 0.6], MIN_SAMPLES);
    let vector = extract_features(&buffer).expect("50 per channel must pass");
    assert!(vector.is_finite());
}

// Helper functions

fn sinusoid(len: usize, cycles: f64, amplitude: f64, phase: f64) -> Vec<f64> {
    (0..len)
        .map(|i| amplitude * (2.0 * PI * cycles * i as f64 / len as f64 + phase).sin())
        .collect()
}

fn constant_buffer(accel: [f64; 3], gyro: [f64; 3], count: usize) -> SampleBuffer {
    let mut buffer = SampleBuffer::new();
    for _ in 0..count {
        buffer.push(SensorKind::Accelerometer, accel[0], accel[1], accel[2]);
        buffer.push(SensorKind::Gyroscope, gyro[0], gyro[1], gyro[2]);
    }
    buffer
}
