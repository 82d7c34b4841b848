//! Implementations for the VehModel state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use super::{Params, VehModelError};
use crate::loc::Pose;
use util::{maths::wrap_pi, module::State, params};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Vehicle kinematic model state
#[derive(Default)]
pub struct VehModel {
    pub(crate) params: Params,

    pose: Pose,

    speed_ms: f64,
}

/// Input data to the vehicle model.
#[derive(Clone, Copy, Default)]
pub struct InputData {
    /// Timestep to integrate over.
    ///
    /// Units: seconds, must be positive
    pub dt_s: f64,

    /// The achieved steering angle, already clamped by the steering actuator.
    ///
    /// Units: degrees
    pub steering_angle_deg: f64,
}

/// Status report for VehModel processing.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    /// True if the heading was integrated this step, false if the step was a
    /// pure translation (steering or speed below epsilon).
    pub turning: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for VehModel {
    type InitData = &'static str;
    type InitError = params::LoadError;

    type InputData = InputData;
    type OutputData = Pose;
    type StatusReport = StatusReport;
    type ProcError = VehModelError;

    /// Initialise the VehModel module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData) -> Result<(), Self::InitError> {
        self.params = params::load(init_data)?;
        Ok(())
    }

    /// Perform cyclic processing of the vehicle model.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        let turning = self.step(input_data.dt_s, input_data.steering_angle_deg)?;

        Ok((self.pose, StatusReport { turning }))
    }
}

impl VehModel {
    /// Create a new model from the given parameters.
    pub fn with_params(params: Params) -> Self {
        VehModel {
            params,
            pose: Pose::default(),
            speed_ms: 0.0,
        }
    }

    /// The current pose of the vehicle.
    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    /// The current speed of the vehicle in meters/second.
    pub fn speed_ms(&self) -> f64 {
        self.speed_ms
    }

    /// Force the speed to the given value, bypassing the ramp.
    pub fn set_speed_ms(&mut self, speed_ms: f64) {
        self.speed_ms = speed_ms;
    }

    /// Ramp the speed towards the demanded value at the configured
    /// acceleration.
    pub fn ramp_speed(&mut self, demand_ms: f64, dt_s: f64) {
        let delta = self.params.accel_ms2 * dt_s;

        if self.speed_ms < demand_ms {
            self.speed_ms = (self.speed_ms + delta).min(demand_ms);
        } else if self.speed_ms > demand_ms {
            self.speed_ms = (self.speed_ms - delta).max(demand_ms);
        }
    }

    /// Decay the speed towards zero, used when there is no target to drive to.
    pub fn coast(&mut self) {
        self.speed_ms *= self.params.coast_decay;
    }

    /// Integrate the pose over one timestep with the given achieved steering
    /// angle.
    ///
    /// Returns whether the heading was integrated. The steering angle is
    /// expected to be pre-clamped by the actuator, so no limit is applied
    /// here.
    pub fn step(&mut self, dt_s: f64, steering_angle_deg: f64) -> Result<bool, VehModelError> {
        if dt_s <= 0.0 {
            return Err(VehModelError::InvalidDeltaTime(dt_s));
        }

        let steering_rad = steering_angle_deg.to_radians();

        // Heading is only integrated when both the steering angle and the
        // speed are above their epsilons, avoiding the near-infinite turn
        // radius of a straight drive.
        let turning = steering_rad.abs() > self.params.steering_epsilon_rad
            && self.speed_ms.abs() > self.params.speed_epsilon_ms;

        if turning {
            let turn_radius_m = self.params.wheelbase_m / steering_rad.tan();
            let ang_vel_rads = self.speed_ms / turn_radius_m;

            self.pose.heading_rad += ang_vel_rads * dt_s;
        }

        self.pose.position_m[0] += self.pose.heading_rad.cos() * self.speed_ms * dt_s;
        self.pose.position_m[1] += self.pose.heading_rad.sin() * self.speed_ms * dt_s;

        self.pose.heading_rad = wrap_pi(self.pose.heading_rad);

        Ok(turning)
    }

    /// Return the vehicle to the origin at rest.
    pub fn reset(&mut self) {
        self.pose = Pose::default();
        self.speed_ms = 0.0;
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    const PI: f64 = std::f64::consts::PI;

    #[test]
    fn test_straight_line() {
        let mut veh = VehModel::with_params(Params::default());
        veh.set_speed_ms(2.0);

        for _ in 0..100 {
            veh.step(0.1, 0.0).unwrap();
        }

        // 10 s at 2 m/s straight down the +X axis
        assert!((veh.pose().position_m[0] - 20.0).abs() < 1e-9);
        assert!(veh.pose().position_m[1].abs() < 1e-9);
        assert!(veh.pose().heading_rad.abs() < 1e-9);
    }

    #[test]
    fn test_heading_always_wrapped() {
        let mut veh = VehModel::with_params(Params::default());
        veh.set_speed_ms(5.0);

        // Hard left lock for long enough to wind the heading round several
        // times
        for _ in 0..2000 {
            veh.step(0.1, 35.0).unwrap();
            let h = veh.pose().heading_rad;
            assert!(h > -PI && h <= PI, "heading {} out of range", h);
        }
    }

    #[test]
    fn test_no_turn_below_epsilon() {
        let mut veh = VehModel::with_params(Params::default());

        // Speed below epsilon: translation happens but heading holds
        veh.set_speed_ms(0.05);
        veh.step(0.1, 20.0).unwrap();
        assert_eq!(veh.pose().heading_rad, 0.0);

        // Steering below epsilon at full speed also holds heading
        veh.set_speed_ms(5.0);
        let turning = veh.step(0.1, 0.01).unwrap();
        assert!(!turning);
        assert_eq!(veh.pose().heading_rad, 0.0);
    }

    #[test]
    fn test_invalid_dt_rejected() {
        let mut veh = VehModel::with_params(Params::default());
        assert!(veh.step(0.0, 0.0).is_err());
        assert!(veh.step(-0.1, 0.0).is_err());
    }

    #[test]
    fn test_speed_ramp() {
        let mut veh = VehModel::with_params(Params::default());

        veh.ramp_speed(5.0, 0.5);
        assert!((veh.speed_ms() - 1.0).abs() < 1e-9);

        // Ramp never overshoots the demand
        for _ in 0..20 {
            veh.ramp_speed(5.0, 0.5);
        }
        assert!((veh.speed_ms() - 5.0).abs() < 1e-9);

        // And ramps back down symmetrically
        veh.ramp_speed(0.0, 0.5);
        assert!((veh.speed_ms() - 4.0).abs() < 1e-9);
    }
}
