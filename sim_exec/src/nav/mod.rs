//! Navigation module
//!
//! Navigation is responsible for steering the vehicle along the loaded
//! waypoint route. It holds the waypoint queue, removes waypoints as the
//! vehicle arrives at them, and computes a corrective steering demand from
//! the bearing to the current target using a proportional pursuit law whose
//! gain is selected by the active drive mode.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod path;
mod pursuit;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::*;
pub use path::*;
pub use pursuit::*;
pub use state::*;
