//! Navigation module state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use super::{DriveMode, NavPath, Params, PursuitCtrl, Waypoint};
use crate::loc::Pose;
use util::params;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Navigation module state.
#[derive(Default)]
pub struct NavCtrl {
    pub(crate) params: Params,

    /// The waypoint route being driven.
    path: NavPath,

    /// The pursuit steering controller.
    pursuit: PursuitCtrl,
}

/// Input data to navigation.
#[derive(Clone, Copy)]
pub struct InputData {
    /// Best estimate of the vehicle pose (usually the latest GPS fix).
    pub pose: Pose,

    /// The active drive mode.
    pub mode: DriveMode,
}

/// Output demands from navigation.
#[derive(Clone, Copy, Serialize, Debug, Default)]
pub struct OutputData {
    /// Steering demand for the actuator.
    ///
    /// Units: degrees
    pub steering_demand_deg: f64,

    /// Speed the vehicle should ramp towards.
    ///
    /// Units: meters/second
    pub speed_demand_ms: f64,

    /// The waypoint currently driven to, `None` once the route is complete.
    pub target: Option<Waypoint>,
}

/// Status report for navigation processing.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    /// Distance from the pose to the current target.
    ///
    /// Units: meters, zero when there is no target
    pub distance_to_target_m: f64,

    /// The pursuit controller's angle error.
    ///
    /// Units: degrees
    pub angle_error_deg: f64,

    /// True if a waypoint was reached and removed this cycle.
    pub waypoint_reached: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl NavCtrl {
    /// Create a new navigation module from the given parameters.
    pub fn with_params(params: Params) -> Self {
        NavCtrl {
            params,
            ..Default::default()
        }
    }

    /// Initialise navigation.
    ///
    /// Expected init data is the path to the parameter file.
    pub fn init(&mut self, params_path: &str) -> Result<(), params::LoadError> {
        self.params = params::load(params_path)?;
        Ok(())
    }

    /// The waypoint route.
    pub fn path(&self) -> &NavPath {
        &self.path
    }

    /// Append a waypoint to the route.
    pub fn add_waypoint(&mut self, x_m: f64, y_m: f64) {
        self.path.add_waypoint(x_m, y_m);
    }

    /// Drop the route.
    pub fn clear_waypoints(&mut self) {
        self.path.clear();
    }

    /// Perform cyclic processing of navigation.
    ///
    /// Advances the route if the vehicle has arrived at the front waypoint,
    /// then computes the steering and speed demands for the active mode.
    pub fn proc(&mut self, input_data: &InputData) -> (OutputData, StatusReport) {
        let mut report = StatusReport::default();

        report.waypoint_reached = self.path.advance_if_arrived(
            &input_data.pose.position_m,
            self.params.arrival_threshold_m,
        );

        let steering_demand_deg = self.pursuit.calculate(
            &input_data.pose,
            &self.path,
            input_data.mode,
            &self.params,
        );
        report.angle_error_deg = self.pursuit.last_angle_error_deg();

        let target = self.path.current_target().copied();

        if let Some(ref wp) = target {
            report.distance_to_target_m =
                (wp.position_m - input_data.pose.position_m).norm();
        }

        let output = OutputData {
            steering_demand_deg,
            speed_demand_ms: input_data.mode.profile().target_speed_ms,
            target,
        };

        (output, report)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use nalgebra::Vector2;

    #[test]
    fn test_route_is_consumed_in_order() {
        let mut nav = NavCtrl::with_params(Params::default());
        nav.add_waypoint(10.0, 0.0);
        nav.add_waypoint(20.0, 0.0);

        let input = InputData {
            pose: Pose {
                position_m: Vector2::new(10.0, 0.0),
                heading_rad: 0.0,
            },
            mode: DriveMode::Follow,
        };

        let (output, report) = nav.proc(&input);
        assert!(report.waypoint_reached);

        // The next target is now the second waypoint, 10 m away
        let target = output.target.unwrap();
        assert_eq!(target.position_m, Vector2::new(20.0, 0.0));
        assert!((report.distance_to_target_m - 10.0).abs() < 1e-9);

        // Dead-ahead target means no steering demand
        assert!(output.steering_demand_deg.abs() < 1e-9);
        assert!((output.speed_demand_ms - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_completed_route_demands_nothing() {
        let mut nav = NavCtrl::with_params(Params::default());
        let input = InputData {
            pose: Pose::default(),
            mode: DriveMode::Follow,
        };

        let (output, report) = nav.proc(&input);
        assert!(output.target.is_none());
        assert_eq!(output.steering_demand_deg, 0.0);
        assert_eq!(report.distance_to_target_m, 0.0);
    }
}
