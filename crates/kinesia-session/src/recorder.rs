//! Recording session orchestration.
//!
//! [`SessionRecorder`] drives one recording at a time through an
//! explicit state machine: `Idle -> Recording -> Draining -> Idle`.
//! Samples are only accepted while recording, extraction and
//! classification only run while draining, and every exit from
//! draining lands back in idle whether the session produced a record
//! or failed. That single-writer handoff is what lets a sensor thread
//! feed samples while a UI thread stops and finishes the session
//! without a torn buffer.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use kinesia_model::AnomalyClassifier;
use kinesia_signal::{extract_features, SampleBuffer, SensorKind, SignalError};

use crate::record::SessionRecord;
use crate::{Result, SessionError};

/// Phases of the recording state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecorderState {
    /// No session in progress; samples are rejected.
    Idle,
    /// Samples are being accepted into the buffer.
    Recording,
    /// Sample intake has stopped; the buffered data is waiting to be
    /// drained into a record.
    Draining,
}

impl RecorderState {
    /// Lowercase name used in errors and log fields.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Draining => "draining",
        }
    }
}

/// Recorder construction options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// Attached to every produced record, when set.
    pub user_id: Option<String>,
}

impl RecorderConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the user id stamped onto produced records.
    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

/// Counters accumulated across the recorder's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecorderStats {
    /// Sessions that produced a record.
    pub sessions_completed: u64,
    /// Sessions abandoned before finishing.
    pub sessions_aborted: u64,
    /// Finish attempts rejected for not having enough samples.
    pub insufficient_data_failures: u64,
    /// Completed sessions classified as suspected anomalies.
    pub positive_predictions: u64,
    /// Completed sessions classified as negative.
    pub negative_predictions: u64,
}

struct RecorderInner {
    state: RecorderState,
    buffer: SampleBuffer,
    started_at: Option<DateTime<Utc>>,
    stopped_at: Option<DateTime<Utc>>,
    stats: RecorderStats,
}

impl RecorderInner {
    fn new() -> Self {
        Self {
            state: RecorderState::Idle,
            buffer: SampleBuffer::new(),
            started_at: None,
            stopped_at: None,
            stats: RecorderStats::default(),
        }
    }

    /// Returns to idle with an empty buffer. Stats survive the reset.
    fn reset_to_idle(&mut self) {
        self.state = RecorderState::Idle;
        self.buffer.clear();
        self.started_at = None;
        self.stopped_at = None;
    }
}

/// Orchestrates one recording at a time against a shared classifier.
///
/// All state lives behind one mutex, so readers always observe a
/// consistent state/buffer pair and writers from different threads
/// cannot interleave a transition with sample intake.
pub struct SessionRecorder {
    classifier: Arc<AnomalyClassifier>,
    config: RecorderConfig,
    inner: Mutex<RecorderInner>,
}

impl SessionRecorder {
    /// Creates an idle recorder using the given classifier for
    /// draining.
    #[must_use]
    pub fn new(classifier: Arc<AnomalyClassifier>) -> Self {
        Self::with_config(classifier, RecorderConfig::default())
    }

    /// Creates an idle recorder with explicit options.
    #[must_use]
    pub fn with_config(classifier: Arc<AnomalyClassifier>, config: RecorderConfig) -> Self {
        Self {
            classifier,
            config,
            inner: Mutex::new(RecorderInner::new()),
        }
    }

    /// Current phase of the state machine.
    #[must_use]
    pub fn state(&self) -> RecorderState {
        self.inner.lock().state
    }

    /// Snapshot of the lifetime counters.
    #[must_use]
    pub fn stats(&self) -> RecorderStats {
        self.inner.lock().stats
    }

    /// Buffered sample counts as `(accelerometer, gyroscope)`.
    #[must_use]
    pub fn sample_counts(&self) -> (usize, usize) {
        let inner = self.inner.lock();
        (
            inner.buffer.len(SensorKind::Accelerometer),
            inner.buffer.len(SensorKind::Gyroscope),
        )
    }

    /// Whether the buffered data would pass the extraction gate.
    #[must_use]
    pub fn has_enough_data(&self) -> bool {
        self.inner.lock().buffer.has_enough_data()
    }

    /// Begins a new session, clearing any residue from the previous
    /// one.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidState`] unless the recorder is
    /// idle.
    pub fn start(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.state != RecorderState::Idle {
            return Err(SessionError::InvalidState {
                expected: RecorderState::Idle.as_str(),
                actual: inner.state.as_str(),
            });
        }
        inner.buffer.clear();
        inner.state = RecorderState::Recording;
        inner.started_at = Some(Utc::now());
        inner.stopped_at = None;
        info!("recording started");
        Ok(())
    }

    /// Appends one 3-axis sample to the given channel.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidState`] unless the recorder is
    /// recording; samples arriving before start or after stop are
    /// rejected rather than silently mixed into another session.
    pub fn record_sample(&self, kind: SensorKind, x: f64, y: f64, z: f64) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.state != RecorderState::Recording {
            return Err(SessionError::InvalidState {
                expected: RecorderState::Recording.as_str(),
                actual: inner.state.as_str(),
            });
        }
        inner.buffer.push(kind, x, y, z);
        Ok(())
    }

    /// Stops sample intake, leaving the buffered data ready to finish.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidState`] unless the recorder is
    /// recording.
    pub fn stop(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.state != RecorderState::Recording {
            return Err(SessionError::InvalidState {
                expected: RecorderState::Recording.as_str(),
                actual: inner.state.as_str(),
            });
        }
        inner.state = RecorderState::Draining;
        inner.stopped_at = Some(Utc::now());
        info!(
            accel = inner.buffer.len(SensorKind::Accelerometer),
            gyro = inner.buffer.len(SensorKind::Gyroscope),
            "recording stopped"
        );
        Ok(())
    }

    /// Drains the stopped session into a classified record.
    ///
    /// The recorder returns to idle whether draining succeeds or
    /// fails; a failed session is not resumable and its samples are
    /// discarded.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidState`] unless the recorder is
    /// draining, and propagates extraction and classification
    /// failures.
    #[instrument(skip(self))]
    pub fn finish(&self) -> Result<SessionRecord> {
        let mut inner = self.inner.lock();
        if inner.state != RecorderState::Draining {
            return Err(SessionError::InvalidState {
                expected: RecorderState::Draining.as_str(),
                actual: inner.state.as_str(),
            });
        }

        let outcome = self.drain(&inner);
        let accel = inner.buffer.len(SensorKind::Accelerometer);
        let gyro = inner.buffer.len(SensorKind::Gyroscope);
        inner.reset_to_idle();

        match outcome {
            Ok(record) => {
                inner.stats.sessions_completed += 1;
                if record.prediction == 1 {
                    inner.stats.positive_predictions += 1;
                } else {
                    inner.stats.negative_predictions += 1;
                }
                info!(accel, gyro, prediction = record.prediction, "session finished");
                Ok(record)
            }
            Err(err) => {
                if matches!(
                    err,
                    SessionError::Signal(SignalError::InsufficientData { .. })
                ) {
                    inner.stats.insufficient_data_failures += 1;
                }
                warn!(accel, gyro, error = %err, "session discarded");
                Err(err)
            }
        }
    }

    /// Abandons the session in progress, if any, and returns to idle.
    /// Calling this while idle does nothing.
    pub fn abort(&self) {
        let mut inner = self.inner.lock();
        if inner.state == RecorderState::Idle {
            return;
        }
        let from = inner.state.as_str();
        inner.reset_to_idle();
        inner.stats.sessions_aborted += 1;
        info!(from, "session aborted");
    }

    fn drain(&self, inner: &RecorderInner) -> Result<SessionRecord> {
        let vector = extract_features(&inner.buffer)?;
        let prediction = self.classifier.predict(vector.as_slice())?;

        let mut record = SessionRecord::new(&vector, &prediction);
        if let (Some(started), Some(stopped)) = (inner.started_at, inner.stopped_at) {
            record = record.with_duration_ms((stopped - started).num_milliseconds());
        }
        if let Some(user_id) = &self.config.user_id {
            record = record.with_user_id(user_id.clone());
        }
        Ok(record)
    }
}

impl std::fmt::Debug for SessionRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("SessionRecorder")
            .field("state", &inner.state)
            .field("accel_samples", &inner.buffer.len(SensorKind::Accelerometer))
            .field("gyro_samples", &inner.buffer.len(SensorKind::Gyroscope))
            .finish()
    }
}
