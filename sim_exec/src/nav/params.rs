//! Navigation parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for navigation
#[derive(Debug, Clone, Deserialize)]
pub struct Params {

    /// Distance to the front waypoint below which it counts as reached and is
    /// removed from the queue.
    ///
    /// Units: meters
    pub arrival_threshold_m: f64,

    /// Limit applied to the steering demand before it is passed to the
    /// actuator.
    ///
    /// Units: degrees
    pub max_steering_angle_deg: f64,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            arrival_threshold_m: 5.0,
            max_steering_angle_deg: 40.0,
        }
    }
}
