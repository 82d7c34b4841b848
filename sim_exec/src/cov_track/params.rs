//! Parameters structure for CovTrack

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for coverage tracking.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {

    /// Full width of the covered swath, the implement width.
    ///
    /// Units: meters
    pub swath_width_m: f64,

    /// Edge length of the square spatial index cells.
    ///
    /// Units: meters
    pub cell_size_m: f64,

    /// Number of trailing samples, beyond the two most recent, excluded from
    /// overlap candidates so the swath segment just created cannot
    /// self-intersect.
    pub shift_indices: usize,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            swath_width_m: 5.0,
            cell_size_m: 50.0,
            shift_indices: 1,
        }
    }
}
