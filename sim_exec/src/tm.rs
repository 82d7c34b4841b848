//! # Guidance telemetry

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The per-cycle telemetry set consumed by a status display collaborator and
/// archived to CSV.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct GuidanceTm {
    /// Simulation time of this cycle.
    ///
    /// Units: seconds
    pub sim_time_s: f64,

    /// Current vehicle speed.
    ///
    /// Units: meters/second
    pub speed_ms: f64,

    /// Steering angle requested by the pursuit controller.
    ///
    /// Units: degrees
    pub target_steering_deg: f64,

    /// Steering angle achieved by the actuator.
    ///
    /// Units: degrees
    pub actual_steering_deg: f64,

    /// Which side of the backlash slack the linkage sits on: -1, 0 or +1.
    pub backlash_state: i8,

    /// One-based index of the waypoint currently driven to.
    pub current_waypoint: usize,

    /// Number of waypoints remaining in the route.
    pub total_waypoints: usize,

    /// Distance to the current target waypoint.
    ///
    /// Units: meters
    pub distance_to_target_m: f64,

    /// Pursuit controller angle error.
    ///
    /// Units: degrees
    pub angle_error_deg: f64,
}
