//! # Data Store
//!
//! The data store is the simulation context: it owns every module's state and
//! advances the whole guidance pipeline by exactly one step per `step` call.
//! The caller supplies the timestep and guarantees serialized invocation;
//! nothing here keeps time or spawns work of its own.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, warn};

// Internal
use crate::cov_track::{self, CovTrack};
use crate::gps_sensor::GpsSensor;
use crate::loc::Pose;
use crate::nav::{self, DriveMode, NavCtrl};
use crate::str_ctrl::{self, StrCtrl, StrCtrlError};
use crate::tm::GuidanceTm;
use crate::veh_model::{self, VehModel, VehModelError};
use util::archive::{Archived, Archiver};
use util::module::State;
use util::session::Session;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur while stepping the simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimStepError {
    #[error("Vehicle model error: {0}")]
    VehModel(#[from] VehModelError),

    #[error("Steering control error: {0}")]
    StrCtrl(#[from] StrCtrlError),
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the simulation.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// Simulation elapsed time
    pub sim_time_s: f64,

    /// The active drive mode
    pub mode: DriveMode,

    /// True once an emergency stop has been triggered. Cleared by reset.
    pub emergency_stopped: bool,

    // Modules
    pub gps: GpsSensor,
    pub veh_model: VehModel,
    pub str_ctrl: StrCtrl,
    pub nav_ctrl: NavCtrl,
    pub cov_track: CovTrack,

    // Last cycle outputs and reports
    pub nav_output: nav::OutputData,
    pub nav_status_rpt: nav::StatusReport,
    pub str_ctrl_status_rpt: str_ctrl::StatusReport,
    pub veh_model_status_rpt: veh_model::StatusReport,
    pub cov_output: cov_track::OutputData,
    pub cov_status_rpt: cov_track::StatusReport,

    /// Telemetry assembled at the end of the cycle
    pub tm: GuidanceTm,

    arch_tm: Archiver,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Set up the telemetry archive for this session.
    pub fn init_archives(&mut self, session: &Session) -> Result<(), Box<dyn std::error::Error>> {
        self.arch_tm = Archiver::from_path(session, "guidance_tm.csv")?;
        Ok(())
    }

    /// Advance the simulation by one tick.
    ///
    /// Runs the full pipeline: GPS sampling, navigation, steering actuation,
    /// kinematics integration and coverage tracking, then assembles the
    /// cycle's telemetry.
    pub fn step(&mut self, dt_s: f64) -> Result<(), SimStepError> {
        self.num_cycles += 1;
        self.sim_time_s += dt_s;

        // Clear the per-cycle outputs
        self.nav_output = nav::OutputData::default();
        self.nav_status_rpt = nav::StatusReport::default();
        self.str_ctrl_status_rpt = str_ctrl::StatusReport::default();
        self.veh_model_status_rpt = veh_model::StatusReport::default();
        self.cov_output = cov_track::OutputData::default();
        self.cov_status_rpt = cov_track::StatusReport::default();

        // An emergency stop freezes the vehicle until a reset
        if self.emergency_stopped {
            self.veh_model.set_speed_ms(0.0);
            self.assemble_tm();
            return Ok(());
        }

        // ---- SENSING ----

        let true_pose = *self.veh_model.pose();
        let new_fix = self.gps.update(&true_pose, dt_s);

        let fix = match self.gps.latest() {
            Some(f) => *f,
            // No fix yet, hold everything until the receiver produces one
            None => {
                self.assemble_tm();
                return Ok(());
            }
        };

        let est_pose = Pose {
            position_m: fix.position_m,
            heading_rad: fix.heading_rad,
        };

        // ---- NAVIGATION ----

        let (nav_output, nav_report) = self.nav_ctrl.proc(&nav::InputData {
            pose: est_pose,
            mode: self.mode,
        });
        self.nav_output = nav_output;
        self.nav_status_rpt = nav_report;

        // ---- ACTUATION AND KINEMATICS ----

        if nav_output.target.is_some() {
            let (actual_deg, str_report) = self.str_ctrl.proc(&str_ctrl::InputData {
                target_angle_deg: nav_output.steering_demand_deg,
                dt_s,
            })?;
            self.str_ctrl_status_rpt = str_report;

            self.veh_model.ramp_speed(nav_output.speed_demand_ms, dt_s);

            let (_, veh_report) = self.veh_model.proc(&veh_model::InputData {
                dt_s,
                steering_angle_deg: actual_deg,
            })?;
            self.veh_model_status_rpt = veh_report;
        } else {
            // Route complete, coast to a stop with the steering released
            self.veh_model.coast();

            let (_, veh_report) = self.veh_model.proc(&veh_model::InputData {
                dt_s,
                steering_angle_deg: 0.0,
            })?;
            self.veh_model_status_rpt = veh_report;
        }

        // ---- COVERAGE ----

        // Coverage samples at the GPS rate, not the tick rate
        if let Some(fix) = new_fix {
            let (cov_output, cov_report) = self.cov_track.proc(fix.position_m);
            self.cov_output = cov_output;
            self.cov_status_rpt = cov_report;

            if cov_output.left_hit || cov_output.right_hit {
                info!(
                    "Coverage overlap at sample {} (left: {}, right: {})",
                    cov_report.num_samples, cov_output.left_hit, cov_output.right_hit
                );
            }
        }

        self.assemble_tm();

        Ok(())
    }

    /// Trigger the emergency stop: speed to zero and the steering actuator
    /// recentred. The route is deliberately kept.
    pub fn trigger_emergency_stop(&mut self) {
        if !self.emergency_stopped {
            warn!("Emergency stop triggered");
            self.emergency_stopped = true;
            self.veh_model.set_speed_ms(0.0);
            self.str_ctrl.recentre();
        }
    }

    /// Return the whole simulation to its initial state.
    ///
    /// Pose, speed, steering, route, coverage history and markers are all
    /// cleared, and any latched emergency stop is released. The drive mode
    /// and module parameters are kept.
    pub fn reset(&mut self) {
        info!("Simulation reset");
        self.veh_model.reset();
        self.str_ctrl.recentre();
        self.nav_ctrl.clear_waypoints();
        self.cov_track.clear();
        self.gps.reset();
        self.emergency_stopped = false;
    }

    /// Assemble the telemetry set from the cycle's outputs.
    fn assemble_tm(&mut self) {
        self.tm = GuidanceTm {
            sim_time_s: self.sim_time_s,
            speed_ms: self.veh_model.speed_ms(),
            target_steering_deg: self.str_ctrl.target_angle_deg(),
            actual_steering_deg: self.str_ctrl.actual_angle_deg(),
            backlash_state: self.str_ctrl.backlash_sign(),
            current_waypoint: self.nav_ctrl.path().visited() + 1,
            total_waypoints: self.nav_ctrl.path().remaining(),
            distance_to_target_m: self.nav_status_rpt.distance_to_target_m,
            angle_error_deg: self.nav_status_rpt.angle_error_deg,
        };
    }
}

impl Archived for DataStore {
    fn write(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.arch_tm.serialise(self.tm)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::gps_sensor;

    const DT_S: f64 = 1.0 / 60.0;

    /// A data store with a noise-free, tick-rate GPS so tests are
    /// deterministic.
    fn quiet_ds() -> DataStore {
        let mut ds = DataStore::default();
        ds.gps = GpsSensor::with_seed(
            gps_sensor::Params {
                noise_m: 0.0,
                heading_noise_rad: 0.0,
                sample_rate_hz: 60.0,
            },
            1,
        );
        ds
    }

    #[test]
    fn test_drives_towards_waypoint() {
        let mut ds = quiet_ds();
        ds.nav_ctrl.add_waypoint(50.0, 0.0);

        for _ in 0..600 {
            ds.step(DT_S).unwrap();
        }

        // 10 s at up to 5 m/s towards a target dead ahead
        let pose = ds.veh_model.pose();
        assert!(pose.position_m[0] > 20.0);
        assert!(pose.position_m[1].abs() < 2.0);
        assert!(ds.tm.speed_ms > 0.0);
    }

    #[test]
    fn test_route_completion_coasts_to_rest() {
        let mut ds = quiet_ds();
        ds.nav_ctrl.add_waypoint(10.0, 0.0);

        for _ in 0..1800 {
            ds.step(DT_S).unwrap();
        }

        // The single waypoint was reached and the vehicle coasted down
        assert!(ds.nav_ctrl.path().is_empty());
        assert!(ds.tm.speed_ms < 0.1);
        assert_eq!(ds.tm.total_waypoints, 0);
    }

    #[test]
    fn test_emergency_stop_keeps_route() {
        let mut ds = quiet_ds();
        ds.nav_ctrl.add_waypoint(50.0, 10.0);

        for _ in 0..120 {
            ds.step(DT_S).unwrap();
        }
        assert!(ds.veh_model.speed_ms() > 0.0);

        ds.trigger_emergency_stop();
        assert_eq!(ds.veh_model.speed_ms(), 0.0);
        assert_eq!(ds.str_ctrl.actual_angle_deg(), 0.0);

        // The route survives and the vehicle stays frozen
        let pos_before = ds.veh_model.pose().position_m;
        for _ in 0..60 {
            ds.step(DT_S).unwrap();
        }
        assert_eq!(ds.veh_model.pose().position_m, pos_before);
        assert_eq!(ds.nav_ctrl.path().remaining(), 1);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut ds = quiet_ds();
        ds.nav_ctrl.add_waypoint(30.0, 0.0);

        for _ in 0..300 {
            ds.step(DT_S).unwrap();
        }
        assert!(ds.cov_track.num_samples() > 0);

        ds.reset();
        assert_eq!(ds.veh_model.pose().position_m[0], 0.0);
        assert_eq!(ds.veh_model.speed_ms(), 0.0);
        assert!(ds.nav_ctrl.path().is_empty());
        assert_eq!(ds.cov_track.num_samples(), 0);
        assert!(ds.cov_track.markers().is_empty());
        assert!(!ds.emergency_stopped);
    }
}
