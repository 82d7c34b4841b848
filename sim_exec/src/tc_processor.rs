//! # Command processor module
//!
//! The command processor handles simulation commands coming from any source.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info};

// Internal
use crate::data_store::DataStore;
use crate::nav::DriveMode;
use crate::tc::SimTc;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Execute a simulation command.
///
/// Mutates the datastore to send commands to different modules.
pub fn exec(ds: &mut DataStore, tc: &SimTc) {
    match tc {
        SimTc::AddWaypoint { x_m, y_m } => {
            debug!("Recieved AddWaypoint ({}, {}) command", x_m, y_m);
            ds.nav_ctrl.add_waypoint(*x_m, *y_m);
        }
        SimTc::ClearWaypoints => {
            debug!("Recieved ClearWaypoints command");
            ds.nav_ctrl.clear_waypoints();
        }
        SimTc::SetMode { mode } => {
            let new_mode = DriveMode::from_key(mode);
            info!("Drive mode changed to {:?} (key \"{}\")", new_mode, mode);
            ds.mode = new_mode;
        }
        SimTc::Reset => {
            debug!("Recieved Reset command");
            ds.reset();
        }
        SimTc::EmergencyStop => {
            debug!("Recieved EmergencyStop command");
            ds.trigger_emergency_stop();
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_commands_reach_modules() {
        let mut ds = DataStore::default();

        exec(&mut ds, &SimTc::AddWaypoint { x_m: 1.0, y_m: 2.0 });
        exec(&mut ds, &SimTc::AddWaypoint { x_m: 3.0, y_m: 4.0 });
        assert_eq!(ds.nav_ctrl.path().remaining(), 2);

        exec(
            &mut ds,
            &SimTc::SetMode {
                mode: "precision".into(),
            },
        );
        assert_eq!(ds.mode, DriveMode::Precision);

        // Unknown keys fall back to follow
        exec(
            &mut ds,
            &SimTc::SetMode {
                mode: "bananas".into(),
            },
        );
        assert_eq!(ds.mode, DriveMode::Follow);

        exec(&mut ds, &SimTc::ClearWaypoints);
        assert!(ds.nav_ctrl.path().is_empty());

        exec(&mut ds, &SimTc::EmergencyStop);
        assert!(ds.emergency_stopped);

        exec(&mut ds, &SimTc::Reset);
        assert!(!ds.emergency_stopped);
    }
}
