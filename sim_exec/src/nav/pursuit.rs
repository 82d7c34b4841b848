//! # Pursuit steering controller
//!
//! This module provides the drive mode profiles and the proportional pursuit
//! law which computes a steering demand from the bearing to the current
//! target waypoint.
//!
//! The lookahead is fixed at the next waypoint itself, there is no
//! interpolation along the segment. The control law applies the mode's
//! proportional gain only; the integral and derivative gains declared in each
//! profile are reserved and not wired into the output (see DESIGN.md).

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use super::{NavPath, Params};
use crate::loc::Pose;
use util::maths::{clamp, wrap_pi};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The closed set of drive modes.
///
/// Each mode selects a gain profile and a target speed. Unrecognised mode
/// keys fall back to `Follow`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriveMode {
    /// Hold the vehicle stationary with zero steering.
    Stop,

    /// General purpose waypoint following.
    Follow,

    /// Slow, tightly tuned following for fine work.
    Precision,

    /// Fast following with a hard proportional gain.
    Aggressive,

    /// Gentle following with a soft gain.
    Smooth,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The fixed tuning profile associated with a drive mode.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ModeProfile {
    /// Proportional gain applied to the angle error.
    pub k_p: f64,

    /// Integral gain. Reserved, not applied by the control law.
    pub k_i: f64,

    /// Derivative gain. Reserved, not applied by the control law.
    pub k_d: f64,

    /// Lookahead distance. Reserved, the target is always the next waypoint.
    ///
    /// Units: meters
    pub lookahead_m: f64,

    /// Speed the executive ramps towards while this mode is active.
    ///
    /// Units: meters/second
    pub target_speed_ms: f64,
}

/// The pursuit steering controller.
#[derive(Debug, Clone, Default)]
pub struct PursuitCtrl {
    /// The angle error of the last calculation, kept for telemetry.
    ///
    /// Units: degrees
    last_angle_error_deg: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DriveMode {
    /// Parse a mode key, falling back to `Follow` for unrecognised keys.
    pub fn from_key(key: &str) -> Self {
        match key {
            "stop" => DriveMode::Stop,
            "follow" => DriveMode::Follow,
            "precision" => DriveMode::Precision,
            "aggressive" => DriveMode::Aggressive,
            "smooth" => DriveMode::Smooth,
            _ => DriveMode::Follow,
        }
    }

    /// Resolve the mode's tuning profile from the fixed table.
    pub fn profile(&self) -> ModeProfile {
        match self {
            DriveMode::Stop => ModeProfile {
                k_p: 0.0,
                k_i: 0.0,
                k_d: 0.0,
                lookahead_m: 0.0,
                target_speed_ms: 0.0,
            },
            DriveMode::Follow => ModeProfile {
                k_p: 2.5,
                k_i: 0.1,
                k_d: 0.8,
                lookahead_m: 8.0,
                target_speed_ms: 5.0,
            },
            DriveMode::Precision => ModeProfile {
                k_p: 3.0,
                k_i: 0.2,
                k_d: 1.2,
                lookahead_m: 5.0,
                target_speed_ms: 2.0,
            },
            DriveMode::Aggressive => ModeProfile {
                k_p: 4.0,
                k_i: 0.05,
                k_d: 0.5,
                lookahead_m: 12.0,
                target_speed_ms: 8.0,
            },
            DriveMode::Smooth => ModeProfile {
                k_p: 1.8,
                k_i: 0.15,
                k_d: 1.5,
                lookahead_m: 10.0,
                target_speed_ms: 4.0,
            },
        }
    }
}

impl Default for DriveMode {
    fn default() -> Self {
        DriveMode::Follow
    }
}

impl PursuitCtrl {
    /// Compute the steering demand in degrees for the given pose and route.
    ///
    /// Degenerate inputs (empty route, `Stop` mode) produce a zero demand and
    /// reset the angle error telemetry, they are not errors.
    pub fn calculate(
        &mut self,
        pose: &Pose,
        path: &NavPath,
        mode: DriveMode,
        params: &Params,
    ) -> f64 {
        // Resolve the profile once for this tick
        let profile = mode.profile();

        let target = match path.current_target() {
            Some(t) if mode != DriveMode::Stop => t,
            _ => {
                self.last_angle_error_deg = 0.0;
                return 0.0;
            }
        };

        // Bearing from the vehicle to the target point
        let bearing_rad = (target.position_m[1] - pose.position_m[1])
            .atan2(target.position_m[0] - pose.position_m[0]);

        // Angle error, wrapped so the vehicle always takes the short way
        // round
        let angle_error_rad = wrap_pi(bearing_rad - pose.heading_rad);
        let angle_error_deg = angle_error_rad.to_degrees();
        self.last_angle_error_deg = angle_error_deg;

        clamp(
            &(angle_error_deg * profile.k_p),
            &-params.max_steering_angle_deg,
            &params.max_steering_angle_deg,
        )
    }

    /// The angle error of the last calculation in degrees, for telemetry.
    pub fn last_angle_error_deg(&self) -> f64 {
        self.last_angle_error_deg
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use nalgebra::Vector2;

    fn pose_at_origin() -> Pose {
        Pose {
            position_m: Vector2::zeros(),
            heading_rad: 0.0,
        }
    }

    #[test]
    fn test_mode_key_parsing() {
        assert_eq!(DriveMode::from_key("stop"), DriveMode::Stop);
        assert_eq!(DriveMode::from_key("follow"), DriveMode::Follow);
        assert_eq!(DriveMode::from_key("precision"), DriveMode::Precision);
        assert_eq!(DriveMode::from_key("aggressive"), DriveMode::Aggressive);
        assert_eq!(DriveMode::from_key("smooth"), DriveMode::Smooth);

        // Unknown keys fall back to follow
        assert_eq!(DriveMode::from_key("warp-speed"), DriveMode::Follow);
        assert_eq!(DriveMode::from_key(""), DriveMode::Follow);
    }

    #[test]
    fn test_aggressive_gain_scaling() {
        let params = Params::default();
        let mut ctrl = PursuitCtrl::default();
        let mut path = NavPath::new();

        // A target 45 degrees off the nose at full aggressive gain saturates
        // the demand at the steering limit
        path.add_waypoint(10.0, 10.0);
        let steering = ctrl.calculate(&pose_at_origin(), &path, DriveMode::Aggressive, &params);
        assert!(steering > 0.0);
        assert_eq!(steering, params.max_steering_angle_deg);

        // A small bearing error scales linearly with the aggressive k_p
        let mut path = NavPath::new();
        path.add_waypoint(10.0, 1.0);
        let steering = ctrl.calculate(&pose_at_origin(), &path, DriveMode::Aggressive, &params);
        let expected = (1.0f64 / 10.0).atan().to_degrees() * 4.0;
        assert!(steering > 0.0);
        assert!((steering - expected).abs() < 1e-9);
        assert!(steering <= params.max_steering_angle_deg);
    }

    #[test]
    fn test_gains_differ_between_modes() {
        let params = Params::default();
        let mut ctrl = PursuitCtrl::default();
        let mut path = NavPath::new();
        path.add_waypoint(10.0, 1.0);

        let pose = pose_at_origin();
        let follow = ctrl.calculate(&pose, &path, DriveMode::Follow, &params);
        let smooth = ctrl.calculate(&pose, &path, DriveMode::Smooth, &params);
        let aggressive = ctrl.calculate(&pose, &path, DriveMode::Aggressive, &params);

        assert!(smooth < follow);
        assert!(follow < aggressive);
    }

    #[test]
    fn test_degenerate_inputs_return_zero() {
        let params = Params::default();
        let mut ctrl = PursuitCtrl::default();

        // Empty route
        let empty = NavPath::new();
        assert_eq!(
            ctrl.calculate(&pose_at_origin(), &empty, DriveMode::Follow, &params),
            0.0
        );
        assert_eq!(ctrl.last_angle_error_deg(), 0.0);

        // Stop mode with a route still loaded
        let mut path = NavPath::new();
        path.add_waypoint(10.0, 10.0);
        ctrl.calculate(&pose_at_origin(), &path, DriveMode::Follow, &params);
        assert!(ctrl.last_angle_error_deg() != 0.0);

        assert_eq!(
            ctrl.calculate(&pose_at_origin(), &path, DriveMode::Stop, &params),
            0.0
        );
        assert_eq!(ctrl.last_angle_error_deg(), 0.0);
    }

    #[test]
    fn test_error_wraps_short_way() {
        let params = Params::default();
        let mut ctrl = PursuitCtrl::default();
        let mut path = NavPath::new();
        path.add_waypoint(-10.0, -1.0);

        // Target is almost directly behind. The raw bearing difference is
        // near a full turn, but the wrapped error must be small.
        let pose = Pose {
            position_m: Vector2::zeros(),
            heading_rad: std::f64::consts::PI - 0.05,
        };
        ctrl.calculate(&pose, &path, DriveMode::Follow, &params);
        let err = ctrl.last_angle_error_deg();
        assert!(err.abs() < 20.0);
    }
}
