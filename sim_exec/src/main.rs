//! Main simulation executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - Scenario command processing and handling
//!         - Simulation step:
//!             - GPS sensing
//!             - Navigation and pursuit steering
//!             - Steering actuation
//!             - Kinematics integration
//!             - Coverage tracking
//!         - Telemetry archiving
//!
//! The simulation runs on a fixed timestep and is advanced as fast as the
//! host allows; it never waits on a display cadence. The run ends when the
//! scenario is exhausted and the route is complete (or an emergency stop has
//! latched), after which the swath geometry and coverage markers are saved
//! into the session directory for the rendering collaborator.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{info, warn};
use std::env;

// Internal
use sim_lib::{
    data_store::DataStore,
    scenario::{PendingTcs, Scenario},
    tc_processor,
};
use util::{
    archive::Archived,
    logger::{logger_init, LevelFilter},
    module::State,
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Fixed simulation timestep.
const SIM_DT_S: f64 = 1.0 / 60.0;

/// Seconds of simulation to keep running after the scenario ends, allowing
/// the vehicle to finish the route.
const DRAIN_TIME_S: f64 = 300.0;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("sim_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Furrow Guidance Simulation Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD SCENARIO ----

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        return Err(eyre!(
            "Expected exactly one argument (the scenario path), found {}",
            args.len() - 1
        ));
    }

    info!("Loading scenario from \"{}\"", &args[1]);

    let mut scenario = Scenario::new(&args[1]).wrap_err("Failed to load scenario")?;

    info!(
        "Loaded scenario lasts {:.02} s and contains {} commands\n",
        scenario.get_duration(),
        scenario.get_num_tcs()
    );

    // ---- INITIALISE DATASTORE ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    // ---- INITIALISE MODULES ----

    ds.veh_model
        .init("veh_model.toml")
        .wrap_err("Failed to initialise VehModel")?;
    info!("VehModel init complete");

    ds.str_ctrl
        .init("str_ctrl.toml")
        .wrap_err("Failed to initialise StrCtrl")?;
    info!("StrCtrl init complete");

    ds.nav_ctrl
        .init("nav_ctrl.toml")
        .wrap_err("Failed to initialise NavCtrl")?;
    info!("NavCtrl init complete");

    ds.cov_track
        .init("cov_track.toml")
        .wrap_err("Failed to initialise CovTrack")?;
    info!("CovTrack init complete");

    ds.gps
        .init("gps_sensor.toml")
        .wrap_err("Failed to initialise GpsSensor")?;
    info!("GpsSensor init complete");

    ds.init_archives(&session)
        .map_err(|e| eyre!("Failed to initialise archives: {}", e))?;

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    let mut scenario_ended = false;
    let mut drain_start_s = 0.0;

    loop {
        // ---- COMMAND PROCESSING ----

        match scenario.get_pending_tcs(ds.sim_time_s) {
            PendingTcs::None => (),
            PendingTcs::Some(tc_vec) => {
                for tc in tc_vec.iter() {
                    tc_processor::exec(&mut ds, tc);
                }
            }
            PendingTcs::EndOfScenario => {
                if !scenario_ended {
                    info!("End of scenario reached");
                    scenario_ended = true;
                    drain_start_s = ds.sim_time_s;
                }
            }
        }

        // ---- SIMULATION PROCESSING ----

        ds.step(SIM_DT_S)
            .wrap_err("Error during simulation step")?;

        // ---- WRITE ARCHIVES ----

        if let Err(e) = ds.write() {
            warn!("Could not write telemetry archive: {}", e);
        }

        // Log progress on the simulated second
        if ds.num_cycles % 60 == 0 {
            let pose = ds.veh_model.pose();
            info!(
                "t={:7.2} s pos=({:8.2}, {:8.2}) m head={:6.3} rad speed={:5.2} m/s \
                 wp {}/{} markers={}",
                ds.sim_time_s,
                pose.position_m[0],
                pose.position_m[1],
                pose.heading_rad,
                ds.tm.speed_ms,
                ds.tm.current_waypoint,
                ds.tm.current_waypoint + ds.tm.total_waypoints - 1,
                ds.cov_track.markers().len(),
            );
        }

        // ---- END CONDITIONS ----

        if scenario_ended {
            // Route complete or stopped: nothing more can happen
            if ds.nav_ctrl.path().is_empty() || ds.emergency_stopped {
                info!("Route complete, stopping");
                break;
            }

            // Give up if the vehicle is still wandering long after the
            // scenario ended
            if ds.sim_time_s - drain_start_s > DRAIN_TIME_S {
                warn!("Route not completed {} s after end of scenario", DRAIN_TIME_S);
                break;
            }
        }
    }

    // ---- SHUTDOWN ----

    info!(
        "Simulation finished after {} cycles ({:.2} s simulated)",
        ds.num_cycles, ds.sim_time_s
    );
    info!(
        "Coverage: {} samples, {} occupied cells, {} overlap markers",
        ds.cov_track.num_samples(),
        ds.cov_track.index().occupied_cells(),
        ds.cov_track.markers().len()
    );

    // Save the geometry outputs for the rendering collaborator
    session
        .save_json("geometry/swath_mesh.json", ds.cov_track.mesh())
        .wrap_err("Failed to save swath mesh")?;
    session
        .save_json("geometry/coverage_markers.json", &ds.cov_track.markers())
        .wrap_err("Failed to save coverage markers")?;

    info!("End of execution");

    Ok(())
}
