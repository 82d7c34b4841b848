//! # Coverage overlap detector
//!
//! Tests new swath boundary points against the indexed swath history. A
//! bounding-box pre-filter gathers the historical sample indices near the
//! vehicle through the spatial index, then each candidate's swath quad is
//! tested with the sign-of-cross-product point-in-triangle method.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::Serialize;

// Internal
use super::{SpatialPathIndex, SwathBuilder};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The coverage overlap detector.
#[derive(Clone, Debug)]
pub struct CoverageDetector {
    /// Half-width of the candidate bounding box around the query centre.
    ///
    /// Units: meters
    box_half_width_m: f64,

    /// Trailing samples excluded from candidates beyond the two most recent.
    shift_indices: usize,
}

/// Result of an overlap check for one boundary pair.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct OverlapResult {
    /// The left boundary point fell inside previously covered ground.
    pub left_hit: bool,

    /// The right boundary point fell inside previously covered ground.
    pub right_hit: bool,

    /// Number of candidate quads tested.
    pub candidates: usize,
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Signed area of the triangle `(p, a, b)`, positive for counterclockwise
/// winding.
pub(crate) fn tri_sign(p: &Vector2<f64>, a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    (p[0] - b[0]) * (a[1] - b[1]) - (a[0] - b[0]) * (p[1] - b[1])
}

/// Inclusive point-in-triangle test.
///
/// The three signed areas must be uniformly non-negative or non-positive, so
/// points on an edge or vertex count as inside.
pub fn point_in_triangle(
    p: &Vector2<f64>,
    a: &Vector2<f64>,
    b: &Vector2<f64>,
    c: &Vector2<f64>,
) -> bool {
    let d1 = tri_sign(p, a, b);
    let d2 = tri_sign(p, b, c);
    let d3 = tri_sign(p, c, a);

    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;

    !(has_neg && has_pos)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl CoverageDetector {
    /// Create a detector for the given swath width and trailing-edge guard.
    ///
    /// The candidate box half-width is twice the swath width.
    pub fn new(swath_width_m: f64, shift_indices: usize) -> Self {
        CoverageDetector {
            box_half_width_m: 2.0 * swath_width_m,
            shift_indices,
        }
    }

    /// Check whether either of a new boundary pair lies in previously covered
    /// ground.
    ///
    /// `sample_count` is the total number of samples recorded so far,
    /// including the one the boundary pair belongs to.
    pub fn check_overlap(
        &self,
        left_m: &Vector2<f64>,
        right_m: &Vector2<f64>,
        centre_m: &Vector2<f64>,
        index: &SpatialPathIndex,
        swath: &SwathBuilder,
        sample_count: usize,
    ) -> OverlapResult {
        let candidates = self.candidates(centre_m, index, sample_count);

        let mut result = OverlapResult {
            candidates: candidates.len(),
            ..Default::default()
        };

        for seq in candidates {
            if !result.left_hit && self.quad_contains(swath, seq, left_m) {
                result.left_hit = true;
            }
            if !result.right_hit && self.quad_contains(swath, seq, right_m) {
                result.right_hit = true;
            }
            if result.left_hit && result.right_hit {
                break;
            }
        }

        result
    }

    /// Gather the historical sample indices eligible for quad testing.
    ///
    /// A candidate must lie strictly inside the bounding box centred on
    /// `centre_m`, must have a predecessor boundary point (seq >= 2), and
    /// must sit clear of the trailing edge: the two most recent samples plus
    /// `shift_indices` more are excluded to avoid self-intersection with the
    /// quad just built.
    fn candidates(
        &self,
        centre_m: &Vector2<f64>,
        index: &SpatialPathIndex,
        sample_count: usize,
    ) -> Vec<usize> {
        let min_m = Vector2::new(
            centre_m[0] - self.box_half_width_m,
            centre_m[1] - self.box_half_width_m,
        );
        let max_m = Vector2::new(
            centre_m[0] + self.box_half_width_m,
            centre_m[1] + self.box_half_width_m,
        );

        let seq_limit = sample_count.saturating_sub(2 + self.shift_indices);

        let mut candidates = Vec::new();

        for chunk in index.chunks_in_box(min_m, max_m) {
            for run in chunk.runs() {
                for (seq, point) in run.iter_seq() {
                    if seq < 2 || seq >= seq_limit {
                        continue;
                    }

                    if point[0] > min_m[0]
                        && point[0] < max_m[0]
                        && point[1] > min_m[1]
                        && point[1] < max_m[1]
                    {
                        candidates.push(seq);
                    }
                }
            }
        }

        candidates
    }

    /// Test whether the swath quad trailing sample `seq` contains the point.
    ///
    /// The quad is `(left[seq-1], left[seq], right[seq], right[seq-1])`,
    /// split into two triangles.
    fn quad_contains(&self, swath: &SwathBuilder, seq: usize, point_m: &Vector2<f64>) -> bool {
        let left = swath.left_points();
        let right = swath.right_points();

        if seq == 0 || seq >= left.len() {
            return false;
        }

        let al = &left[seq - 1];
        let ar = &right[seq - 1];
        let bl = &left[seq];
        let br = &right[seq];

        point_in_triangle(point_m, al, bl, br) || point_in_triangle(point_m, br, ar, al)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    /// Drive a straight swath along +X with the given spacing and sample
    /// count, returning the populated builder and index.
    fn straight_swath(
        swath_width_m: f64,
        spacing_m: f64,
        samples: usize,
    ) -> (SwathBuilder, SpatialPathIndex) {
        let mut swath = SwathBuilder::new(swath_width_m);
        let mut index = SpatialPathIndex::new(50.0);

        for seq in 0..samples {
            let p = Vector2::new(seq as f64 * spacing_m, 0.0);
            index.insert(p, seq);
            swath.add_sample(p);
        }

        (swath, index)
    }

    #[test]
    fn test_point_in_triangle_inclusive() {
        let a = Vector2::new(0.0, 0.0);
        let b = Vector2::new(10.0, 0.0);
        let c = Vector2::new(0.0, 10.0);

        assert!(point_in_triangle(&Vector2::new(2.0, 2.0), &a, &b, &c));
        assert!(!point_in_triangle(&Vector2::new(8.0, 8.0), &a, &b, &c));

        // Boundary points count as inside
        assert!(point_in_triangle(&Vector2::new(5.0, 0.0), &a, &b, &c));
        assert!(point_in_triangle(&a, &a, &b, &c));
    }

    #[test]
    fn test_straight_swath_round_trip() {
        let width = 5.0;
        let (swath, index) = straight_swath(width, 10.0, 10);

        let detector = CoverageDetector::new(width, 1);

        // A point strictly inside the 3rd quad (x in [20, 30], |y| < 2.5),
        // probed as if the vehicle had come back to that ground
        let probe = Vector2::new(25.0, 0.0);
        let result = detector.check_overlap(&probe, &probe, &probe, &index, &swath, 10);
        assert!(result.candidates > 0);
        assert!(result.left_hit);
        assert!(result.right_hit);

        // A point further than twice the swath width from the path reports
        // no hit
        let far = Vector2::new(25.0, 11.0);
        let result = detector.check_overlap(&far, &far, &far, &index, &swath, 10);
        assert!(!result.left_hit);
        assert!(!result.right_hit);
    }

    #[test]
    fn test_trailing_edge_excluded() {
        let width = 5.0;
        let (swath, index) = straight_swath(width, 1.0, 10);

        let detector = CoverageDetector::new(width, 1);

        // The current position sits on the trail itself, but every nearby
        // sample is within the trailing-edge guard, so nothing may hit
        let probe = Vector2::new(9.0, 0.0);
        let result = detector.check_overlap(&probe, &probe, &probe, &index, &swath, 10);
        assert!(!result.left_hit);
        assert!(!result.right_hit);
    }

    #[test]
    fn test_early_samples_have_no_quads() {
        let width = 5.0;
        let (swath, index) = straight_swath(width, 1.0, 3);

        let detector = CoverageDetector::new(width, 1);

        // With only 3 samples every index is either too early or too recent
        let probe = Vector2::new(1.0, 0.0);
        let result = detector.check_overlap(&probe, &probe, &probe, &index, &swath, 3);
        assert_eq!(result.candidates, 0);
    }
}
