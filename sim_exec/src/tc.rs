//! # Simulation commands
//!
//! Commands are instructions delivered to the running simulation, either from
//! a scenario script or from an embedding application.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A command that can be executed by the simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SimTc {
    /// Append a waypoint to the back of the route.
    AddWaypoint {
        /// X position of the waypoint in meters.
        x_m: f64,

        /// Y position of the waypoint in meters.
        y_m: f64,
    },

    /// Drop every waypoint from the route.
    ClearWaypoints,

    /// Select the active drive mode by key.
    ///
    /// Unrecognised keys fall back to the `follow` mode.
    SetMode {
        /// One of `stop`, `follow`, `precision`, `aggressive`, `smooth`.
        mode: String,
    },

    /// Return the whole simulation to its initial state: pose, speed,
    /// steering, route, coverage history and markers are all cleared.
    Reset,

    /// Force the speed to zero and recentre the steering actuator. The
    /// route is kept; a `Reset` is required to resume.
    EmergencyStop,
}
