//! Coverage tracking module
//!
//! CovTrack records the ribbon of ground covered by the vehicle's implement
//! (the swath) and detects when the current swath edges re-enter ground that
//! was already covered earlier in the run.
//!
//! Every accepted position sample is appended to the sample history and
//! indexed into a sparse cell grid of contiguous sample runs so that the
//! history near the vehicle can be found without scanning the whole
//! trajectory. From the second sample on, left and right swath boundary
//! points are derived and stitched into a triangulated quad strip. Each new
//! boundary point is then tested against the locally indexed historical quads
//! with an inclusive point-in-triangle test; a hit produces a coverage
//! marker.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod detector;
mod grid;
mod params;
mod state;
mod swath;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use detector::*;
pub use grid::*;
pub use params::*;
pub use state::*;
pub use swath::*;
