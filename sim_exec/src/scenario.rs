//! # Scenario interpreter module
//!
//! This module provides an interpreter for scenario scripts, allowing
//! simulation commands to be executed at scripted points in simulation time.
//!
//! A scenario is a plain text file of `time: command;` lines, where the time
//! is seconds of simulation time and the command is the JSON form of a
//! [`SimTc`], e.g.
//!
//! ```text
//! 0.0: {"SetMode": {"mode": "follow"}};
//! 0.0: {"AddWaypoint": {"x_m": 50.0, "y_m": 0.0}};
//! 30.0: {"EmergencyStop": null};
//! ```

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use regex::RegexBuilder;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Internal
use crate::tc::SimTc;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A command which is scripted to occur at a specific time.
pub struct Command {
    /// The simulation time the command is supposed to execute at
    exec_time_s: f64,

    /// The command to run
    tc: SimTc,
}

/// A scenario interpreter.
///
/// After initialising with the path to the scenario to run use
/// `get_pending_tcs` each cycle to acquire the commands that need executing.
pub struct Scenario {
    _scenario_path: PathBuf,
    cmds: VecDeque<Command>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Could not find the scenario at {0}")]
    ScenarioNotFound(String),

    #[error("Could not load the scenario: {0}")]
    ScenarioLoadError(std::io::Error),

    #[error("The scenario is empty (or is so bad it can't be read)")]
    ScenarioEmpty,

    #[error(
        "Scenario contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)")]
    InvalidTimestamp(String),

    #[error("Scenario contains an invalid command at {0} s: {1}")]
    InvalidTc(f64, serde_json::Error),
}

pub enum PendingTcs {
    None,
    Some(Vec<SimTc>),
    EndOfScenario,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Scenario {
    /// Create a new interpreter from the given scenario path.
    pub fn new<P: AsRef<Path>>(scenario_path: P) -> Result<Self, ScenarioError> {
        // Get the path in a buffer
        let path = PathBuf::from(scenario_path.as_ref());

        // Check that the scenario file exists.
        if !path.exists() {
            return Err(ScenarioError::ScenarioNotFound(
                path.to_string_lossy().to_string(),
            ));
        }

        // Load the scenario into a string
        let scenario = match fs::read_to_string(scenario_path) {
            Ok(s) => s,
            Err(e) => return Err(ScenarioError::ScenarioLoadError(e)),
        };

        // Empty queue of commands
        let mut tc_queue: VecDeque<Command> = VecDeque::new();

        // Go through the scenario executing __the magic regex__.
        let re = RegexBuilder::new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
            .multi_line(true)
            .build()
            .unwrap();

        let mut num_caps = 0;

        for cap in re.captures_iter(&scenario) {
            // Parse the exec time
            let exec_time_s: f64 = match cap.get(1).unwrap().as_str().parse() {
                Ok(t) => t,
                Err(e) => return Err(ScenarioError::InvalidTimestamp(format!("{}", e))),
            };

            // Parse the command from the payload. The scenarios contain JSON
            // only.
            let tc: SimTc = match serde_json::from_str(cap.get(3).unwrap().as_str()) {
                Ok(c) => c,
                Err(e) => return Err(ScenarioError::InvalidTc(exec_time_s, e)),
            };

            // Build command from the match
            tc_queue.push_back(Command { exec_time_s, tc });

            num_caps += 1;
        }

        if num_caps == 0 {
            return Err(ScenarioError::ScenarioEmpty);
        }

        Ok(Scenario {
            _scenario_path: path,
            cmds: tc_queue,
        })
    }

    /// Return a vector of pending commands, or `None` if no commands need
    /// executing at the given simulation time.
    pub fn get_pending_tcs(&mut self, sim_time_s: f64) -> PendingTcs {
        // If the queue is empty the scenario is over and we return the end of
        // scenario variant
        if self.cmds.is_empty() {
            return PendingTcs::EndOfScenario;
        }

        let mut tc_vec: Vec<SimTc> = vec![];

        // Peek items from the queue, if the head's exec time is lower than
        // the current time add it to the vector, and keep adding commands
        // until the exec times are larger than the current time.
        while self
            .cmds
            .front()
            .map(|c| c.exec_time_s <= sim_time_s)
            .unwrap_or(false)
        {
            tc_vec.push(self.cmds.pop_front().unwrap().tc);
        }

        // If the vector is longer than 0 return Some, otherwise None
        if !tc_vec.is_empty() {
            PendingTcs::Some(tc_vec)
        } else {
            PendingTcs::None
        }
    }

    /// Get the number of commands remaining in the scenario
    pub fn get_num_tcs(&self) -> usize {
        self.cmds.len()
    }

    /// Get the length of the scenario in seconds
    pub fn get_duration(&self) -> f64 {
        match self.cmds.back() {
            Some(c) => c.exec_time_s,
            None => 0f64,
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    fn write_temp_scenario(name: &str, content: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_commands_released_in_time_order() {
        let path = write_temp_scenario(
            "scenario_order_test.fsc",
            "0.0: {\"SetMode\": {\"mode\": \"follow\"}};\n\
             0.0: {\"AddWaypoint\": {\"x_m\": 10.0, \"y_m\": 0.0}};\n\
             5.0: {\"AddWaypoint\": {\"x_m\": 20.0, \"y_m\": 0.0}};\n\
             9.5: {\"EmergencyStop\": null};\n",
        );

        let mut scenario = Scenario::new(&path).unwrap();
        assert_eq!(scenario.get_num_tcs(), 4);
        assert!((scenario.get_duration() - 9.5).abs() < 1e-9);

        // At t=0 the two immediate commands are released together
        match scenario.get_pending_tcs(0.0) {
            PendingTcs::Some(tcs) => assert_eq!(tcs.len(), 2),
            _ => panic!("expected pending commands at t=0"),
        }

        // Nothing more until the 5 s mark
        assert!(matches!(scenario.get_pending_tcs(4.9), PendingTcs::None));
        match scenario.get_pending_tcs(5.0) {
            PendingTcs::Some(tcs) => assert_eq!(tcs.len(), 1),
            _ => panic!("expected pending command at t=5"),
        }

        // Each command is released exactly once
        assert!(matches!(scenario.get_pending_tcs(5.0), PendingTcs::None));

        match scenario.get_pending_tcs(10.0) {
            PendingTcs::Some(tcs) => assert_eq!(tcs.len(), 1),
            _ => panic!("expected pending command at t=10"),
        }
        assert!(matches!(
            scenario.get_pending_tcs(10.0),
            PendingTcs::EndOfScenario
        ));
    }

    #[test]
    fn test_empty_scenario_rejected() {
        let path = write_temp_scenario("scenario_empty_test.fsc", "# just a comment\n");
        assert!(matches!(
            Scenario::new(&path),
            Err(ScenarioError::ScenarioEmpty)
        ));
    }

    #[test]
    fn test_bad_command_rejected() {
        let path = write_temp_scenario(
            "scenario_bad_tc_test.fsc",
            "1.0: {\"LaunchRocket\": null};\n",
        );
        assert!(matches!(
            Scenario::new(&path),
            Err(ScenarioError::InvalidTc(_, _))
        ));
    }
}
