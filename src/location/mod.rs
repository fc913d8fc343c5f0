//! User positioning: fixes, failure taxonomy, and the tracking loop.

pub mod tracker;
pub mod types;

pub use tracker::{LocationTracker, PositionSource, WatchId};
pub use types::{LocationError, LocationEvent, PermissionState, Position};
