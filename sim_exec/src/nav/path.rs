//! # Waypoint path
//!
//! This module defines the waypoint queue followed by the navigation system.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A single waypoint of the route.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Waypoint {
    /// Position of the waypoint in the ground plane.
    ///
    /// Units: meters
    pub position_m: Vector2<f64>,
}

/// The ordered queue of waypoints still to be visited.
///
/// Waypoints are consumed front-first as the vehicle arrives at them. An
/// empty queue is not an error, callers treat it as "hold position".
#[derive(Clone, Debug, Default)]
pub struct NavPath {
    waypoints: VecDeque<Waypoint>,

    /// Number of waypoints removed by arrival since the last clear.
    visited: usize,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl NavPath {
    /// Create a new empty path
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a waypoint to the back of the queue.
    pub fn add_waypoint(&mut self, x_m: f64, y_m: f64) {
        self.waypoints.push_back(Waypoint {
            position_m: Vector2::new(x_m, y_m),
        });
    }

    /// The waypoint currently being driven to, or `None` if the route is
    /// complete.
    pub fn current_target(&self) -> Option<&Waypoint> {
        self.waypoints.front()
    }

    /// Remove the front waypoint if the given position is within the arrival
    /// threshold of it.
    ///
    /// Returns `true` if a waypoint was removed.
    pub fn advance_if_arrived(&mut self, position_m: &Vector2<f64>, threshold_m: f64) -> bool {
        let arrived = match self.waypoints.front() {
            Some(wp) => (wp.position_m - position_m).norm() < threshold_m,
            None => false,
        };

        if arrived {
            self.waypoints.pop_front();
            self.visited += 1;
        }

        arrived
    }

    /// Number of waypoints remaining in the queue.
    pub fn remaining(&self) -> usize {
        self.waypoints.len()
    }

    /// Number of waypoints reached since the last clear.
    pub fn visited(&self) -> usize {
        self.visited
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Drop all waypoints and the visit counter.
    pub fn clear(&mut self) {
        self.waypoints.clear();
        self.visited = 0;
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_arrival_removes_one_waypoint() {
        let mut path = NavPath::new();
        path.add_waypoint(0.0, 0.0);
        path.add_waypoint(5.0, 5.0);

        // Standing exactly on the first waypoint with a threshold of 1
        let here = Vector2::new(0.0, 0.0);
        assert!(path.advance_if_arrived(&here, 1.0));

        // Exactly one was removed, the next is now the target
        assert_eq!(path.remaining(), 1);
        let target = path.current_target().unwrap();
        assert_eq!(target.position_m, Vector2::new(5.0, 5.0));

        // Arriving at the last waypoint empties the queue
        let there = Vector2::new(5.0, 5.0);
        assert!(path.advance_if_arrived(&there, 1.0));
        assert!(path.current_target().is_none());
        assert_eq!(path.visited(), 2);
    }

    #[test]
    fn test_not_arrived_outside_threshold() {
        let mut path = NavPath::new();
        path.add_waypoint(10.0, 0.0);

        // The threshold test is strict, a point exactly on the boundary does
        // not count as arrived
        let boundary = Vector2::new(9.0, 0.0);
        assert!(!path.advance_if_arrived(&boundary, 1.0));
        assert_eq!(path.remaining(), 1);
    }

    #[test]
    fn test_empty_path_holds() {
        let mut path = NavPath::new();
        assert!(path.current_target().is_none());
        assert!(!path.advance_if_arrived(&Vector2::zeros(), 1.0));
    }
}
