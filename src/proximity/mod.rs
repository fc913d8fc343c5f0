//! Proximity alerting state machine.
//!
//! Tracks, per attraction, whether the user is inside the proximity radius
//! and when the attraction last fired an alert. An alert fires only on an
//! out-of-range to in-range transition with the cooldown window elapsed;
//! hovering inside the radius or bouncing out and back in during cooldown
//! stays silent.
//!
//! All temporal decisions use position timestamps rather than wall-clock
//! reads, so the machine is deterministic under synthetic fix sequences.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Attraction;
use crate::geo;
use crate::location::Position;

/// Fix accuracy beyond which evaluation is considered advisory.
const ACCURACY_SANITY_METERS: f64 = 200.0;

/// Proximity engine tuning.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityConfig {
    /// Radius within which an attraction is considered nearby.
    pub threshold_meters: f64,
    /// Minimum time between alerts for the same attraction.
    pub cooldown_ms: u64,
    /// Expected cadence of position updates. Informational; the actual
    /// cadence is whatever the location tracker pushes.
    pub tracking_interval_ms: u64,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            threshold_meters: 1000.0,
            cooldown_ms: 300_000,
            tracking_interval_ms: 10_000,
        }
    }
}

/// An alert raised when an attraction enters the proximity radius.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProximityAlert {
    /// Unique per alert instance: attraction identity plus fire time.
    pub id: String,
    pub attraction: Attraction,
    /// Distance from the user at fire time, in meters.
    pub distance: f64,
    pub timestamp: DateTime<Utc>,
    pub dismissed: bool,
}

/// Per-attraction range tracking.
#[derive(Debug, Clone, Copy, Default)]
struct PoiState {
    in_range: bool,
    last_alert_at: Option<DateTime<Utc>>,
}

/// The alerting state machine.
pub struct ProximityEngine {
    config: ProximityConfig,
    states: HashMap<String, PoiState>,
    /// All alerts this session, most recent first.
    alerts: Vec<ProximityAlert>,
}

impl ProximityEngine {
    pub fn new(config: ProximityConfig) -> Self {
        Self {
            config,
            states: HashMap::new(),
            alerts: Vec::new(),
        }
    }

    pub fn config(&self) -> &ProximityConfig {
        &self.config
    }

    /// Evaluate a position fix against the active catalog.
    ///
    /// Returns the alerts fired by this fix, if any. State transitions:
    /// * in range, was out, cooldown elapsed (or first time) -> fire;
    /// * in range otherwise -> silent entry/stay;
    /// * out of range -> reset to out-of-range whatever the prior state.
    ///
    /// A re-alert therefore requires both an observed exit and an elapsed
    /// cooldown.
    pub fn process_position(
        &mut self,
        position: &Position,
        attractions: &[Attraction],
    ) -> Vec<ProximityAlert> {
        if let Some(accuracy) = position.accuracy {
            if accuracy > ACCURACY_SANITY_METERS {
                tracing::debug!(
                    "Evaluating low-accuracy fix ({accuracy:.0}m); alerts are advisory"
                );
            }
        }

        let cooldown = Duration::milliseconds(self.config.cooldown_ms as i64);
        let mut fired = Vec::new();

        for attraction in attractions {
            let distance = geo::distance_meters(
                position.latitude,
                position.longitude,
                attraction.latitude,
                attraction.longitude,
            );

            let should_fire = {
                let state = self.states.entry(attraction.id.clone()).or_default();
                if distance <= self.config.threshold_meters {
                    if state.in_range {
                        false
                    } else {
                        state.in_range = true;
                        let cooled_down = match state.last_alert_at {
                            Some(last) => position.timestamp - last >= cooldown,
                            None => true,
                        };
                        if cooled_down {
                            state.last_alert_at = Some(position.timestamp);
                        } else {
                            tracing::debug!(
                                "'{}' re-entered range during cooldown; suppressed",
                                attraction.name
                            );
                        }
                        cooled_down
                    }
                } else {
                    state.in_range = false;
                    false
                }
            };

            if should_fire {
                fired.push(self.fire_alert(attraction, distance, position.timestamp));
            }
        }

        fired
    }

    fn fire_alert(
        &mut self,
        attraction: &Attraction,
        distance: f64,
        timestamp: DateTime<Utc>,
    ) -> ProximityAlert {
        // A newer alert supersedes any lingering one for the same
        // attraction, keeping at most one non-dismissed alert per id.
        for alert in &mut self.alerts {
            if alert.attraction.id == attraction.id {
                alert.dismissed = true;
            }
        }

        let alert = ProximityAlert {
            id: format!("{}_{}", attraction.id, timestamp.timestamp_millis()),
            attraction: attraction.clone(),
            distance,
            timestamp,
            dismissed: false,
        };
        tracing::debug!(
            "Proximity alert for '{}' at {:.0}m",
            attraction.name,
            distance
        );
        self.alerts.insert(0, alert.clone());
        alert
    }

    /// All alerts this session, most recent first.
    pub fn alerts(&self) -> &[ProximityAlert] {
        &self.alerts
    }

    /// Non-dismissed alerts, most recent first.
    pub fn active_alerts(&self) -> Vec<&ProximityAlert> {
        self.alerts.iter().filter(|a| !a.dismissed).collect()
    }

    /// Mark an alert dismissed. Idempotent; unknown ids are ignored. Leaves
    /// the per-attraction range state untouched.
    pub fn dismiss_alert(&mut self, alert_id: &str) {
        if let Some(alert) = self.alerts.iter_mut().find(|a| a.id == alert_id) {
            alert.dismissed = true;
        }
    }

    /// Drop the alert history. Range states and cooldowns are kept, so this
    /// does not re-arm suppressed attractions.
    pub fn clear_alerts(&mut self) {
        self.alerts.clear();
    }
}

impl Default for ProximityEngine {
    fn default() -> Self {
        Self::new(ProximityConfig::default())
    }
}
