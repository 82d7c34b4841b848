//! Parameters structure for VehModel

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the vehicle kinematic model.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {

    // ---- GEOMETRY ----

    /// Distance between the front and rear axles.
    ///
    /// Units: meters
    pub wheelbase_m: f64,

    // ---- INTEGRATION GUARDS ----

    /// Steering angles with magnitude below this produce no heading change.
    ///
    /// Units: radians
    pub steering_epsilon_rad: f64,

    /// Speeds with magnitude below this produce no heading change.
    ///
    /// Units: meters/second
    pub speed_epsilon_ms: f64,

    // ---- SPEED MANAGEMENT ----

    /// Acceleration used when ramping towards a demanded speed.
    ///
    /// Units: meters/second^2
    pub accel_ms2: f64,

    /// Per-tick speed decay factor applied when coasting with no target.
    pub coast_decay: f64,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            wheelbase_m: 2.5,
            steering_epsilon_rad: 0.001,
            speed_epsilon_ms: 0.1,
            accel_ms2: 2.0,
            coast_decay: 0.95,
        }
    }
}
