//! # GPS sensor emulation
//!
//! Produces noisy position fixes of the vehicle's true pose at a fixed sample
//! rate decoupled from the simulation tick rate. Between fixes the last one
//! remains available, matching a real receiver that holds its last solution
//! until the next epoch.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

// Internal
use crate::loc::Pose;
use util::params;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the GPS emulation.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    /// Peak-to-peak amplitude of the uniform position noise.
    ///
    /// Units: meters
    pub noise_m: f64,

    /// Peak-to-peak amplitude of the uniform heading noise.
    ///
    /// Units: radians
    pub heading_noise_rad: f64,

    /// Rate at which new fixes are produced.
    ///
    /// Units: hertz
    pub sample_rate_hz: f64,
}

/// A single position fix.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct GpsFix {
    /// Noisy position estimate.
    ///
    /// Units: meters
    pub position_m: Vector2<f64>,

    /// Noisy heading estimate.
    ///
    /// Units: radians
    pub heading_rad: f64,
}

/// The GPS sensor emulation.
pub struct GpsSensor {
    pub(crate) params: Params,

    rng: StdRng,

    /// Simulation time accumulated since the last fix.
    since_fix_s: f64,

    fix: Option<GpsFix>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Params {
            noise_m: 0.3,
            heading_noise_rad: 0.05,
            sample_rate_hz: 5.0,
        }
    }
}

impl Default for GpsSensor {
    fn default() -> Self {
        Self::with_params(Params::default())
    }
}

impl GpsSensor {
    /// Create a new sensor from the given parameters.
    pub fn with_params(params: Params) -> Self {
        let period = 1.0 / params.sample_rate_hz;

        GpsSensor {
            params,
            rng: StdRng::from_entropy(),
            // Start one full period in so the very first update produces a
            // fix
            since_fix_s: period,
            fix: None,
        }
    }

    /// Create a sensor with a fixed RNG seed for reproducible runs.
    pub fn with_seed(params: Params, seed: u64) -> Self {
        let mut sensor = Self::with_params(params);
        sensor.rng = StdRng::seed_from_u64(seed);
        sensor
    }

    /// Initialise the GPS sensor.
    ///
    /// Expected init data is the path to the parameter file.
    pub fn init(&mut self, params_path: &str) -> Result<(), params::LoadError> {
        *self = Self::with_params(params::load(params_path)?);
        Ok(())
    }

    /// Advance the sensor by one tick of simulation time.
    ///
    /// Returns the new fix if one was produced this tick, `None` otherwise.
    pub fn update(&mut self, true_pose: &Pose, dt_s: f64) -> Option<GpsFix> {
        self.since_fix_s += dt_s;

        let period_s = 1.0 / self.params.sample_rate_hz;
        if self.since_fix_s < period_s {
            return None;
        }
        self.since_fix_s = 0.0;

        let fix = GpsFix {
            position_m: Vector2::new(
                true_pose.position_m[0] + self.noise(self.params.noise_m),
                true_pose.position_m[1] + self.noise(self.params.noise_m),
            ),
            heading_rad: true_pose.heading_rad + self.noise(self.params.heading_noise_rad),
        };

        self.fix = Some(fix);
        Some(fix)
    }

    /// The most recent fix, if any has been produced yet.
    pub fn latest(&self) -> Option<&GpsFix> {
        self.fix.as_ref()
    }

    /// Drop the held fix and restart the sample clock.
    pub fn reset(&mut self) {
        self.since_fix_s = 1.0 / self.params.sample_rate_hz;
        self.fix = None;
    }

    fn noise(&mut self, amplitude: f64) -> f64 {
        (self.rng.gen::<f64>() - 0.5) * amplitude
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
