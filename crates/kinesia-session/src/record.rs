//! Persisted session records.
//!
//! [`SessionRecord`] is the flattened result of one completed
//! recording: every extracted feature as a named field, the classifier
//! outcome, timing, and the sync bookkeeping a storage backend fills
//! in. Serialized field names follow the camelCase convention of the
//! companion sync service, so a record round-trips through its JSON
//! API unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kinesia_model::Prediction;
use kinesia_signal::normalize::index;
use kinesia_signal::{FeatureVector, FEATURE_COUNT};

/// One completed recording session, ready to store or sync.
///
/// The 21 feature fields are the normalized feature vector flattened
/// into named columns, in the same fixed order the extractor produces
/// them. [`SessionRecord::new`] performs that mapping; nothing else
/// should.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Storage-assigned identifier, absent until the record is saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Owner of the session, when the embedder tracks users.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Moment the session was classified.
    pub timestamp: DateTime<Utc>,

    /// Accelerometer X-axis mean.
    pub accel_x_mean: f64,
    /// Accelerometer Y-axis mean.
    pub accel_y_mean: f64,
    /// Accelerometer Z-axis mean.
    pub accel_z_mean: f64,
    /// Accelerometer X-axis standard deviation.
    pub accel_x_std: f64,
    /// Accelerometer Y-axis standard deviation.
    pub accel_y_std: f64,
    /// Accelerometer Z-axis standard deviation.
    pub accel_z_std: f64,
    /// Gyroscope X-axis mean.
    pub gyro_x_mean: f64,
    /// Gyroscope Y-axis mean.
    pub gyro_y_mean: f64,
    /// Gyroscope Z-axis mean.
    pub gyro_z_mean: f64,
    /// Gyroscope X-axis standard deviation.
    pub gyro_x_std: f64,
    /// Gyroscope Y-axis standard deviation.
    pub gyro_y_std: f64,
    /// Gyroscope Z-axis standard deviation.
    pub gyro_z_std: f64,
    /// Accelerometer X-axis FFT peak magnitude.
    pub accel_x_fft_peak: f64,
    /// Accelerometer Y-axis FFT peak magnitude.
    pub accel_y_fft_peak: f64,
    /// Accelerometer Z-axis FFT peak magnitude.
    pub accel_z_fft_peak: f64,
    /// Gyroscope X-axis FFT peak magnitude.
    pub gyro_x_fft_peak: f64,
    /// Gyroscope Y-axis FFT peak magnitude.
    pub gyro_y_fft_peak: f64,
    /// Gyroscope Z-axis FFT peak magnitude.
    pub gyro_z_fft_peak: f64,
    /// Accelerometer/gyroscope X-axis cross-correlation.
    pub cross_corr_x: f64,
    /// Accelerometer/gyroscope Y-axis cross-correlation.
    pub cross_corr_y: f64,
    /// Accelerometer/gyroscope Z-axis cross-correlation.
    pub cross_corr_z: f64,

    /// Numeric classification outcome: 0 negative, 1 suspected.
    pub prediction: i32,
    /// Human-readable classification outcome.
    pub prediction_text: String,
    /// Recording duration in milliseconds, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<i64>,
    /// Moment this record was created locally.
    pub created_at: DateTime<Utc>,
    /// Whether the record has been uploaded to the sync service.
    #[serde(rename = "isSynced")]
    pub synced: bool,
}

impl SessionRecord {
    /// Builds a record from a normalized feature vector and its
    /// classification, flattening each vector position into the
    /// matching named field.
    #[must_use]
    pub fn new(features: &FeatureVector, prediction: &Prediction) -> Self {
        let v = features.values();
        let now = Utc::now();
        Self {
            id: None,
            user_id: None,
            timestamp: now,
            accel_x_mean: v[index::ACCEL_X_MEAN],
            accel_y_mean: v[index::ACCEL_Y_MEAN],
            accel_z_mean: v[index::ACCEL_Z_MEAN],
            accel_x_std: v[index::ACCEL_X_STD],
            accel_y_std: v[index::ACCEL_Y_STD],
            accel_z_std: v[index::ACCEL_Z_STD],
            gyro_x_mean: v[index::GYRO_X_MEAN],
            gyro_y_mean: v[index::GYRO_Y_MEAN],
            gyro_z_mean: v[index::GYRO_Z_MEAN],
            gyro_x_std: v[index::GYRO_X_STD],
            gyro_y_std: v[index::GYRO_Y_STD],
            gyro_z_std: v[index::GYRO_Z_STD],
            accel_x_fft_peak: v[index::ACCEL_X_FFT_PEAK],
            accel_y_fft_peak: v[index::ACCEL_Y_FFT_PEAK],
            accel_z_fft_peak: v[index::ACCEL_Z_FFT_PEAK],
            gyro_x_fft_peak: v[index::GYRO_X_FFT_PEAK],
            gyro_y_fft_peak: v[index::GYRO_Y_FFT_PEAK],
            gyro_z_fft_peak: v[index::GYRO_Z_FFT_PEAK],
            cross_corr_x: v[index::CROSS_CORR_X],
            cross_corr_y: v[index::CROSS_CORR_Y],
            cross_corr_z: v[index::CROSS_CORR_Z],
            prediction: prediction.label.as_i32(),
            prediction_text: prediction.label.text().to_string(),
            duration_ms: None,
            created_at: now,
            synced: false,
        }
    }

    /// Attaches an owning user.
    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Attaches the measured recording duration.
    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: i64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Marks the record as uploaded under a storage-assigned id.
    pub fn mark_synced(&mut self, id: i64) {
        self.id = Some(id);
        self.synced = true;
    }

    /// Reassembles the feature vector from the named fields, in vector
    /// order. Inverse of the mapping done by [`SessionRecord::new`].
    #[must_use]
    pub fn feature_values(&self) -> [f64; FEATURE_COUNT] {
        let mut values = [0.0; FEATURE_COUNT];
        values[index::ACCEL_X_MEAN] = self.accel_x_mean;
        values[index::ACCEL_Y_MEAN] = self.accel_y_mean;
        values[index::ACCEL_Z_MEAN] = self.accel_z_mean;
        values[index::ACCEL_X_STD] = self.accel_x_std;
        values[index::ACCEL_Y_STD] = self.accel_y_std;
        values[index::ACCEL_Z_STD] = self.accel_z_std;
        values[index::GYRO_X_MEAN] = self.gyro_x_mean;
        values[index::GYRO_Y_MEAN] = self.gyro_y_mean;
        values[index::GYRO_Z_MEAN] = self.gyro_z_mean;
        values[index::GYRO_X_STD] = self.gyro_x_std;
        values[index::GYRO_Y_STD] = self.gyro_y_std;
        values[index::GYRO_Z_STD] = self.gyro_z_std;
        values[index::ACCEL_X_FFT_PEAK] = self.accel_x_fft_peak;
        values[index::ACCEL_Y_FFT_PEAK] = self.accel_y_fft_peak;
        values[index::ACCEL_Z_FFT_PEAK] = self.accel_z_fft_peak;
        values[index::GYRO_X_FFT_PEAK] = self.gyro_x_fft_peak;
        values[index::GYRO_Y_FFT_PEAK] = self.gyro_y_fft_peak;
        values[index::GYRO_Z_FFT_PEAK] = self.gyro_z_fft_peak;
        values[index::CROSS_CORR_X] = self.cross_corr_x;
        values[index::CROSS_CORR_Y] = self.cross_corr_y;
        values[index::CROSS_CORR_Z] = self.cross_corr_z;
        values
    }
}
