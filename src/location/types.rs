//! Position fixes and the location failure taxonomy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single position fix. Immutable; later fixes supersede earlier ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    /// Fix accuracy radius in meters, when the platform reports one.
    pub accuracy: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl Position {
    /// A fix stamped with the current time.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy: None,
            timestamp: Utc::now(),
        }
    }

    /// A fix with an explicit timestamp. Synthetic position sequences in
    /// tests are built with this.
    pub fn at(latitude: f64, longitude: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            accuracy: None,
            timestamp,
        }
    }

    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = Some(accuracy);
        self
    }
}

/// Platform permission state for location access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Granted,
    Denied,
    Prompt,
    Unknown,
}

/// Location failure taxonomy.
///
/// `PermissionDenied` is terminal: tracking stops. The others are transient
/// and forwarded to subscribers without halting the tracking loop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("location access denied by user")]
    PermissionDenied,

    #[error("location information unavailable")]
    PositionUnavailable,

    #[error("location request timed out")]
    Timeout,

    #[error("unknown location error: {0}")]
    Unknown(String),
}

impl LocationError {
    /// Whether tracking can continue after this error.
    pub fn is_transient(&self) -> bool {
        !matches!(self, LocationError::PermissionDenied)
    }
}

/// Notification pushed to tracker subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationEvent {
    /// A new, accepted position fix.
    Fix(Position),
    /// A failure from the positioning source. Transient errors do not stop
    /// the stream.
    Error(LocationError),
}
