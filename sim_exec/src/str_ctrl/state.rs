//! Implementations for the StrCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use super::{Params, StrCtrlError};
use util::{maths::clamp, module::State, params};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Steering actuator state.
#[derive(Default)]
pub struct StrCtrl {
    pub(crate) params: Params,

    /// The clamped requested angle from the last update.
    target_angle_deg: f64,

    /// The angle the mechanism has actually achieved.
    actual_angle_deg: f64,

    /// Sign of the last applied step difference.
    last_direction: i8,

    /// Which side of the backlash slack the linkage currently sits on.
    backlash_sign: i8,

    /// Steps of slack still to be taken up before motion transmits.
    backlash_remaining_steps: f64,
}

/// Input data to steering control.
#[derive(Clone, Copy, Default)]
pub struct InputData {
    /// The requested steering angle.
    ///
    /// Units: degrees, clamped internally to the actuator limits
    pub target_angle_deg: f64,

    /// Timestep of this update.
    ///
    /// Units: seconds, must be positive
    pub dt_s: f64,
}

/// Status report for StrCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    /// True if the commanded motion was limited by the maximum step rate.
    pub rate_limited: bool,

    /// True if the motion fell inside the dead-band and the motor held
    /// position.
    pub dead_band_hold: bool,

    /// True if part of the motion was absorbed taking up backlash.
    pub backlash_active: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for StrCtrl {
    type InitData = &'static str;
    type InitError = params::LoadError;

    type InputData = InputData;
    type OutputData = f64;
    type StatusReport = StatusReport;
    type ProcError = StrCtrlError;

    /// Initialise the StrCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData) -> Result<(), Self::InitError> {
        self.params = params::load(init_data)?;
        Ok(())
    }

    /// Perform cyclic processing of steering control.
    ///
    /// The output data is the achieved steering angle in degrees.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        let mut report = StatusReport::default();
        let actual = self.update(input_data.target_angle_deg, input_data.dt_s, &mut report)?;

        Ok((actual, report))
    }
}

impl StrCtrl {
    /// Create a new actuator from the given parameters, at rest in the
    /// centred position.
    pub fn with_params(params: Params) -> Self {
        StrCtrl {
            params,
            ..Default::default()
        }
    }

    /// The achieved steering angle in degrees.
    pub fn actual_angle_deg(&self) -> f64 {
        self.actual_angle_deg
    }

    /// The clamped requested angle from the last update, in degrees.
    pub fn target_angle_deg(&self) -> f64 {
        self.target_angle_deg
    }

    /// Which side of the backlash slack the linkage sits on: -1, 0 or +1.
    pub fn backlash_sign(&self) -> i8 {
        self.backlash_sign
    }

    /// Return the mechanism to the centred, slack-free position.
    ///
    /// Used by the emergency stop and by a full simulation reset.
    pub fn recentre(&mut self) {
        self.target_angle_deg = 0.0;
        self.actual_angle_deg = 0.0;
        self.last_direction = 0;
        self.backlash_sign = 0;
        self.backlash_remaining_steps = 0.0;
    }

    /// Advance the actuator one tick towards the requested angle.
    ///
    /// Returns the achieved angle, which always satisfies
    /// `|actual| <= max_angle_deg`.
    pub fn update(
        &mut self,
        target_angle_deg: f64,
        dt_s: f64,
        report: &mut StatusReport,
    ) -> Result<f64, StrCtrlError> {
        if dt_s <= 0.0 {
            return Err(StrCtrlError::InvalidDeltaTime(dt_s));
        }

        // Clamp the request to the mechanism's limits
        self.target_angle_deg = clamp(
            &target_angle_deg,
            &-self.params.max_angle_deg,
            &self.params.max_angle_deg,
        );

        let target_steps = self.target_angle_deg * self.params.steps_per_degree;
        let current_steps = self.actual_angle_deg * self.params.steps_per_degree;
        let mut step_diff = target_steps - current_steps;

        // Take up backlash before any motion transmits
        step_diff = self.apply_backlash(step_diff, report);

        // Nonlinear resistance, the linkage stiffens towards full lock
        let angle_ratio = self.actual_angle_deg.abs() / self.params.max_angle_deg;
        step_diff *= 1.0 - angle_ratio * self.params.nonlinearity_coeff;

        // Stiction, strongest for small corrective motions
        let friction = self.params.friction_coeff * (1.0 - step_diff.abs() / 100.0);
        step_diff *= 1.0 - friction;

        // Limit to the motor's step rate
        let max_steps = self.params.max_steps_per_second * dt_s;
        let steps_to_move = clamp(&step_diff, &-max_steps, &max_steps);
        if steps_to_move != step_diff {
            report.rate_limited = true;
        }

        // Transmit the motion unless it falls inside the dead-band
        if steps_to_move.abs() > self.params.dead_zone_deg * self.params.steps_per_degree {
            self.actual_angle_deg += steps_to_move / self.params.steps_per_degree;
        } else {
            report.dead_band_hold = true;
        }

        // Invariant: the achieved angle never exceeds the limits
        self.actual_angle_deg = clamp(
            &self.actual_angle_deg,
            &-self.params.max_angle_deg,
            &self.params.max_angle_deg,
        );

        Ok(self.actual_angle_deg)
    }

    /// Absorb part of the step difference into the backlash take-up buffer.
    ///
    /// A direction reversal relative to the side the linkage last engaged on
    /// arms a take-up buffer of `backlash_steps`. While the buffer holds and
    /// the direction is unchanged, commanded steps keep being absorbed until
    /// the buffer is exhausted, after which motion transmits again.
    fn apply_backlash(&mut self, step_diff: f64, report: &mut StatusReport) -> f64 {
        let direction: i8 = if step_diff > 0.0 {
            1
        } else if step_diff < 0.0 {
            -1
        } else {
            0
        };

        let mut out = step_diff;

        if direction != 0 && direction != self.last_direction {
            if self.backlash_sign != direction {
                // Direction change, arm the take-up buffer
                self.backlash_sign = direction;
                self.backlash_remaining_steps = self.params.backlash_steps.abs();

                let absorbed = self.backlash_remaining_steps.min(out.abs());
                out = out.signum() * (out.abs() - absorbed);
                self.backlash_remaining_steps -= absorbed;
                report.backlash_active = true;
            }
        } else if self.backlash_remaining_steps > 0.0 && direction == self.last_direction {
            // Still traversing the slack from a previous reversal
            let absorbed = self.backlash_remaining_steps.min(out.abs());
            out = out.signum() * (out.abs() - absorbed);
            self.backlash_remaining_steps -= absorbed;
            report.backlash_active = true;
        }

        self.last_direction = direction;

        out
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
