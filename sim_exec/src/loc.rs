//! # Localisation types
//!
//! The simulation runs on a flat 2D ground plane, so a pose is a position in
//! the plane plus a heading about the vertical axis.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The pose of the vehicle in the ground plane.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Pose {
    /// Position in the ground plane.
    ///
    /// Units: meters
    pub position_m: Vector2<f64>,

    /// Heading, the angle between the vehicle's forward direction and the +X
    /// axis, following the right hand rule about the vertical.
    ///
    /// Units: radians, wrapped into (-pi, pi]
    pub heading_rad: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose {
    /// Unit vector pointing in the direction the vehicle is facing.
    pub fn forward(&self) -> Vector2<f64> {
        Vector2::new(self.heading_rad.cos(), self.heading_rad.sin())
    }
}

impl Default for Pose {
    fn default() -> Self {
        Pose {
            position_m: Vector2::zeros(),
            heading_rad: 0.0,
        }
    }
}
