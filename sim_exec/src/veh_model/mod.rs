//! Vehicle kinematic model module
//!
//! The vehicle is modelled as a kinematic bicycle: the achieved steering angle
//! and current speed give a turn radius about which the heading is integrated,
//! and the position advances along the heading. The model performs no dynamics
//! (no slip, no inertia), matching the guidance-level fidelity of the rest of
//! the simulation.

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

/// Possible errors that can occur during VehModel operation.
#[derive(Debug, thiserror::Error)]
pub enum VehModelError {
    /// A non-positive timestep cannot be made physically meaningful, so it is
    /// a contract violation rather than an absorbable input.
    #[error("Expected a positive timestep, got {0} s")]
    InvalidDeltaTime(f64),
}
