//! Parameters structure for StrCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the steering actuator emulation.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {

    // ---- CAPABILITIES ----

    /// Maximum achievable steering angle (symmetric about zero).
    ///
    /// Units: degrees
    pub max_angle_deg: f64,

    /// Maximum rate of the stepper motor.
    ///
    /// Units: steps/second
    pub max_steps_per_second: f64,

    /// Gearing ratio between motor steps and steering angle.
    ///
    /// Units: steps/degree
    pub steps_per_degree: f64,

    // ---- IMPERFECTIONS ----

    /// Motions smaller than this are not transmitted (motor cogging).
    ///
    /// Units: degrees
    pub dead_zone_deg: f64,

    /// Mechanical slack to be taken up on a direction reversal.
    ///
    /// Units: steps
    pub backlash_steps: f64,

    /// Fractional stiffening of the linkage at full lock. Zero disables the
    /// effect, one stops the actuator entirely at the limits.
    pub nonlinearity_coeff: f64,

    /// Stiction coefficient damping small step differences.
    pub friction_coeff: f64,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            max_angle_deg: 40.0,
            max_steps_per_second: 200.0,
            steps_per_degree: 15.0,
            dead_zone_deg: 0.05,
            backlash_steps: 3.0,
            nonlinearity_coeff: 0.4,
            friction_coeff: 0.15,
        }
    }
}
