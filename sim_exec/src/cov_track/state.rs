//! Implementations for the CovTrack state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::Serialize;

// Internal
use super::{CoverageDetector, Params, SpatialPathIndex, SwathBuilder, SwathMesh};
use util::params;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Coverage tracking module state.
pub struct CovTrack {
    pub(crate) params: Params,

    /// Full history of accepted samples, indexed by sequence number.
    samples_m: Vec<Vector2<f64>>,

    /// Spatial index over the sample history.
    index: SpatialPathIndex,

    /// Swath boundary and mesh builder.
    swath: SwathBuilder,

    /// Overlap detector.
    detector: CoverageDetector,

    /// Positions where a swath edge re-entered covered ground. Append-only
    /// until an explicit clear.
    markers_m: Vec<Vector2<f64>>,
}

/// Output data of one coverage tracking cycle.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct OutputData {
    /// The boundary pair derived for this sample, `None` for the first
    /// sample.
    pub edges_m: Option<(Vector2<f64>, Vector2<f64>)>,

    /// The left boundary point re-entered covered ground.
    pub left_hit: bool,

    /// The right boundary point re-entered covered ground.
    pub right_hit: bool,
}

/// Status report for CovTrack processing.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    /// Total samples recorded.
    pub num_samples: usize,

    /// Candidate quads tested this cycle.
    pub candidates_tested: usize,

    /// Total coverage markers recorded.
    pub num_markers: usize,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for CovTrack {
    fn default() -> Self {
        Self::with_params(Params::default())
    }
}

impl CovTrack {
    /// Create a new coverage tracker from the given parameters.
    pub fn with_params(params: Params) -> Self {
        let index = SpatialPathIndex::new(params.cell_size_m);
        let swath = SwathBuilder::new(params.swath_width_m);
        let detector = CoverageDetector::new(params.swath_width_m, params.shift_indices);

        CovTrack {
            params,
            samples_m: Vec::new(),
            index,
            swath,
            detector,
            markers_m: Vec::new(),
        }
    }

    /// Initialise coverage tracking.
    ///
    /// Expected init data is the path to the parameter file.
    pub fn init(&mut self, params_path: &str) -> Result<(), params::LoadError> {
        let params: Params = params::load(params_path)?;
        *self = Self::with_params(params);
        Ok(())
    }

    /// Process the next position sample.
    ///
    /// Appends the sample to the history and the spatial index, extends the
    /// swath, and tests the new boundary points against the indexed history.
    /// A hit appends a coverage marker at the offending edge point.
    pub fn proc(&mut self, position_m: Vector2<f64>) -> (OutputData, StatusReport) {
        let seq = self.samples_m.len();
        self.samples_m.push(position_m);
        self.index.insert(position_m, seq);

        let mut output = OutputData::default();
        let mut report = StatusReport::default();

        if let Some((left, right)) = self.swath.add_sample(position_m) {
            let result = self.detector.check_overlap(
                &left,
                &right,
                &position_m,
                &self.index,
                &self.swath,
                self.samples_m.len(),
            );

            if result.left_hit {
                self.markers_m.push(left);
            }
            if result.right_hit {
                self.markers_m.push(right);
            }

            output.edges_m = Some((left, right));
            output.left_hit = result.left_hit;
            output.right_hit = result.right_hit;
            report.candidates_tested = result.candidates;
        }

        report.num_samples = self.samples_m.len();
        report.num_markers = self.markers_m.len();

        (output, report)
    }

    /// The renderable swath quad strip.
    pub fn mesh(&self) -> &SwathMesh {
        self.swath.mesh()
    }

    /// The recorded coverage markers.
    pub fn markers(&self) -> &[Vector2<f64>] {
        &self.markers_m
    }

    /// The spatial index over the sample history.
    pub fn index(&self) -> &SpatialPathIndex {
        &self.index
    }

    /// Number of samples recorded.
    pub fn num_samples(&self) -> usize {
        self.samples_m.len()
    }

    /// Drop the sample history, index, swath and markers.
    pub fn clear(&mut self) {
        self.samples_m.clear();
        self.index.clear();
        self.swath.clear();
        self.markers_m.clear();
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
