//! End-to-end tests of the recording pipeline.
//!
//! These drive the public surface the way an embedding app does: raw
//! sensor samples in, classified and stored session records out.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use kinesia_model::{
    Activation, AnomalyClassifier, DenseLayer, DenseNetwork, MockBackend, ModelError,
};
use kinesia_session::{
    InMemoryRepository, RecorderState, SessionError, SessionRecorder, SessionRepository,
};
use kinesia_signal::{extract_features, SampleBuffer, SensorKind, MIN_SAMPLES};

/// Validate the whole pipeline: samples through buffering, extraction,
/// classification, and storage.
#[tokio::test]
async fn validate_full_pipeline() {
    let recorder = mock_recorder(0.87);
    let mut reference = SampleBuffer::new();

    recorder.start().unwrap();
    for i in 0..120 {
        let (ax, ay, az, gx, gy, gz) = motion_sample(i);
        recorder
            .record_sample(SensorKind::Accelerometer, ax, ay, az)
            .unwrap();
        recorder
            .record_sample(SensorKind::Gyroscope, gx, gy, gz)
            .unwrap();
        reference.push(SensorKind::Accelerometer, ax, ay, az);
        reference.push(SensorKind::Gyroscope, gx, gy, gz);
    }
    recorder.stop().unwrap();
    let record = recorder.finish().unwrap();

    // The record's named fields must be exactly the vector the
    // extractor produces for the same samples, position for position.
    let expected = extract_features(&reference).unwrap();
    assert_eq!(&record.feature_values(), expected.values());

    assert_eq!(record.prediction, 1);
    assert_eq!(record.prediction_text, "Suspected anomaly");
    assert!(record.duration_ms.is_some());
    assert_eq!(record.id, None, "ids are storage-assigned");

    let repository = InMemoryRepository::new();
    let saved = repository.save(record).await.unwrap();
    assert_eq!(saved.id, Some(1));
    assert!(saved.synced);

    let fetched = repository.get(1).await.unwrap().unwrap();
    assert_eq!(fetched, saved);
    assert_eq!(repository.len(), 1);

    println!(
        "Pipeline produced record id {:?} with prediction {} ({})",
        saved.id, saved.prediction, saved.prediction_text
    );
}

/// Validate a dense network artifact driving classification end to
/// end, on both sides of the decision threshold.
#[tokio::test]
async fn validate_dense_artifact_classification() {
    let repository = InMemoryRepository::new();

    for (bias, expected_prediction, expected_text) in
        [(2.0, 1, "Suspected anomaly"), (-2.0, 0, "No anomaly")]
    {
        let classifier = Arc::new(AnomalyClassifier::new());
        classifier
            .initialize(Box::new(dense_constant_scorer(bias)))
            .unwrap();
        let recorder = SessionRecorder::new(classifier);

        recorder.start().unwrap();
        record_motion(&recorder, 80);
        recorder.stop().unwrap();

        let record = recorder.finish().unwrap();
        assert_eq!(record.prediction, expected_prediction);
        assert_eq!(record.prediction_text, expected_text);
        repository.save(record).await.unwrap();
    }

    let all = repository.list().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, Some(1));
    assert_eq!(all[1].id, Some(2));
    println!("Stored {} artifact-classified sessions", all.len());
}

/// Validate that too-short recordings fail recoverably and leave the
/// recorder usable for another attempt.
#[test]
fn validate_short_recording_rejection() {
    let recorder = mock_recorder(0.5);

    recorder.start().unwrap();
    record_motion(&recorder, MIN_SAMPLES - 1);
    recorder.stop().unwrap();

    let err = recorder.finish().unwrap_err();
    assert!(err.is_recoverable());
    let message = err.to_string();
    assert!(message.contains("insufficient data"), "{message}");
    assert_eq!(recorder.state(), RecorderState::Idle);

    // Long enough on the retry.
    recorder.start().unwrap();
    record_motion(&recorder, MIN_SAMPLES);
    recorder.stop().unwrap();
    assert!(recorder.finish().is_ok());
}

/// Validate the distinct refusal when no model is loaded, and recovery
/// once one is.
#[test]
fn validate_model_unavailable_refusal() {
    let classifier = Arc::new(AnomalyClassifier::new());
    let recorder = SessionRecorder::new(Arc::clone(&classifier));

    recorder.start().unwrap();
    record_motion(&recorder, 60);
    recorder.stop().unwrap();

    let err = recorder.finish().unwrap_err();
    assert!(matches!(
        err,
        SessionError::Model(ModelError::NotInitialized)
    ));
    assert!(err.is_recoverable());
    assert!(err.to_string().contains("not initialized"));
    assert_eq!(recorder.state(), RecorderState::Idle);

    classifier
        .initialize(Box::new(MockBackend::returning(0.3)))
        .unwrap();
    recorder.start().unwrap();
    record_motion(&recorder, 60);
    recorder.stop().unwrap();

    let record = recorder.finish().unwrap();
    assert_eq!(record.prediction, 0);
}

/// Validate that a sensor thread hammering samples and a controlling
/// thread stopping the session cannot tear the buffer.
#[test]
fn validate_sampling_thread_handoff() {
    let recorder = Arc::new(mock_recorder(0.6));
    recorder.start().unwrap();
    record_motion(&recorder, MIN_SAMPLES);

    let sensor = Arc::clone(&recorder);
    let handle = thread::spawn(move || {
        let mut delivered = 0usize;
        loop {
            let (ax, ay, az, gx, gy, gz) = motion_sample(delivered);
            if sensor
                .record_sample(SensorKind::Accelerometer, ax, ay, az)
                .is_err()
            {
                break;
            }
            // The stop can land between the two pushes; that strands at
            // most one extra accelerometer sample.
            let _ = sensor.record_sample(SensorKind::Gyroscope, gx, gy, gz);
            delivered += 1;
        }
        delivered
    });

    thread::sleep(Duration::from_millis(20));
    recorder.stop().unwrap();
    let delivered = handle.join().unwrap();

    let (accel, gyro) = recorder.sample_counts();
    assert!(accel >= MIN_SAMPLES && gyro >= MIN_SAMPLES);
    assert!(accel >= gyro && accel - gyro <= 1);

    let record = recorder.finish().unwrap();
    assert_eq!(record.prediction, 1);
    assert_eq!(recorder.sample_counts(), (0, 0));
    println!("Sensor thread delivered {delivered} sample pairs past the gate");
}

/// Validate the pipeline-wide feature width and threshold contracts.
#[test]
fn validate_cross_crate_contracts() {
    assert_eq!(kinesia_signal::FEATURE_COUNT, kinesia_model::FEATURE_COUNT);
    assert_eq!(kinesia_model::DECISION_THRESHOLD, 0.5);
}

// Test helpers

fn mock_recorder(score: f64) -> SessionRecorder {
    SessionRecorder::new(Arc::new(AnomalyClassifier::with_backend(Box::new(
        MockBackend::returning(score),
    ))))
}

/// Tremor-like motion: a 5 Hz oscillation over a slow postural sway,
/// sampled at the nominal 50 Hz rate.
fn motion_sample(i: usize) -> (f64, f64, f64, f64, f64, f64) {
    let t = i as f64 / 50.0;
    let tremor = (2.0 * std::f64::consts::PI * 5.0 * t).sin();
    let sway = (2.0 * std::f64::consts::PI * 0.8 * t).cos();
    (
        0.4 * tremor + 0.05 * sway,
        0.3 * tremor,
        9.81 + 0.2 * sway,
        0.9 * tremor,
        0.1 * sway,
        0.05 * tremor + 0.2 * sway,
    )
}

fn record_motion(recorder: &SessionRecorder, samples: usize) {
    for i in 0..samples {
        let (ax, ay, az, gx, gy, gz) = motion_sample(i);
        recorder
            .record_sample(SensorKind::Accelerometer, ax, ay, az)
            .unwrap();
        recorder
            .record_sample(SensorKind::Gyroscope, gx, gy, gz)
            .unwrap();
    }
}

/// Dense network whose zero weights make the score depend only on the
/// bias, so the outcome is deterministic for any recorded motion.
fn dense_constant_scorer(bias: f64) -> DenseNetwork {
    DenseNetwork {
        name: format!("constant-{bias}"),
        input_len: kinesia_model::FEATURE_COUNT,
        layers: vec![DenseLayer {
            weights: vec![vec![0.0; kinesia_model::FEATURE_COUNT]],
            biases: vec![bias],
            activation: Activation::Sigmoid,
        }],
    }
}
