//! Steering control module
//!
//! StrCtrl emulates the geared stepper mechanism that drives the steering
//! linkage. A requested angle is converted into an achieved angle once per
//! tick, subject to the imperfections of a real mechanism:
//!
//! 1. Backlash - slack in the linkage which must be taken up before motion
//!    transmits in a newly reversed direction.
//! 2. Nonlinear resistance - the linkage stiffens towards the steering
//!    extremes.
//! 3. Stiction - small corrective motions are damped disproportionately.
//! 4. A maximum step rate, and a dead-band below which the motor holds
//!    position.
//!
//! All internal arithmetic happens in actuator step units (degrees multiplied
//! by the steps-per-degree gearing ratio).

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during StrCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum StrCtrlError {
    /// A non-positive timestep cannot be made physically meaningful, so it is
    /// a contract violation rather than an absorbable input.
    #[error("Expected a positive timestep, got {0} s")]
    InvalidDeltaTime(f64),
}
