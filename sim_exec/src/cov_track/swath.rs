//! # Swath builder
//!
//! Derives the left and right swath boundary points from consecutive position
//! samples and stitches them into a triangulated quad strip for the rendering
//! collaborator.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::Serialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The renderable quad strip of the swath.
///
/// Vertices are packed `x, y` pairs; every consecutive left/right boundary
/// pair contributes two triangles. Both buffers are append-only between
/// resets.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SwathMesh {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

/// Builds the swath boundary sequences and mesh from position samples.
#[derive(Clone, Debug, Default)]
pub struct SwathBuilder {
    /// Half the configured swath width.
    ///
    /// Units: meters
    half_width_m: f64,

    /// The previous accepted sample, needed to derive a travel direction.
    last_position_m: Option<Vector2<f64>>,

    /// Left boundary points, parallel to the sample sequence.
    left_points_m: Vec<Vector2<f64>>,

    /// Right boundary points, parallel to the sample sequence.
    right_points_m: Vec<Vector2<f64>>,

    mesh: SwathMesh,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SwathBuilder {
    /// Create a builder for a swath of the given full width.
    pub fn new(swath_width_m: f64) -> Self {
        SwathBuilder {
            half_width_m: swath_width_m / 2.0,
            ..Default::default()
        }
    }

    /// Accept the next position sample.
    ///
    /// The first sample produces no boundary points since a travel direction
    /// needs two samples. From the second sample on, the boundary pair for
    /// this sample is returned and the mesh is extended by one quad. The
    /// first pair is stored twice so the boundary sequences stay parallel to
    /// the sample sequence.
    pub fn add_sample(&mut self, position_m: Vector2<f64>) -> Option<(Vector2<f64>, Vector2<f64>)> {
        let last = match self.last_position_m.replace(position_m) {
            Some(l) => l,
            None => return None,
        };

        let dir = position_m - last;

        // Perpendicular of the travel direction scaled to the half width. A
        // zero direction (duplicate sample) degenerates to a zero offset.
        let mag = dir.norm();
        let orth = if mag > 0.0 {
            Vector2::new(-dir[1], dir[0]) * (self.half_width_m / mag)
        } else {
            Vector2::zeros()
        };

        let left = position_m - orth;
        let right = position_m + orth;

        if self.left_points_m.is_empty() {
            self.left_points_m.push(left);
            self.right_points_m.push(right);
            self.mesh.push_pair(left, right);
        }

        self.left_points_m.push(left);
        self.right_points_m.push(right);
        self.mesh.push_pair(left, right);

        let base = ((self.left_points_m.len() - 2) * 2) as u32;
        self.mesh.push_quad(base);

        Some((left, right))
    }

    /// Left boundary points, indexed by sample sequence.
    pub fn left_points(&self) -> &[Vector2<f64>] {
        &self.left_points_m
    }

    /// Right boundary points, indexed by sample sequence.
    pub fn right_points(&self) -> &[Vector2<f64>] {
        &self.right_points_m
    }

    /// The renderable quad strip.
    pub fn mesh(&self) -> &SwathMesh {
        &self.mesh
    }

    /// Drop all boundary points and mesh data.
    pub fn clear(&mut self) {
        self.last_position_m = None;
        self.left_points_m.clear();
        self.right_points_m.clear();
        self.mesh = SwathMesh::default();
    }
}

impl SwathMesh {
    fn push_pair(&mut self, left_m: Vector2<f64>, right_m: Vector2<f64>) {
        self.vertices.push(left_m[0] as f32);
        self.vertices.push(left_m[1] as f32);
        self.vertices.push(right_m[0] as f32);
        self.vertices.push(right_m[1] as f32);
    }

    fn push_quad(&mut self, base: u32) {
        self.indices.push(base);
        self.indices.push(base + 1);
        self.indices.push(base + 2);
        self.indices.push(base + 1);
        self.indices.push(base + 3);
        self.indices.push(base + 2);
    }

    /// Number of quads in the strip.
    pub fn num_quads(&self) -> usize {
        self.indices.len() / 6
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_first_sample_has_no_boundary() {
        let mut swath = SwathBuilder::new(4.0);
        assert!(swath.add_sample(Vector2::new(0.0, 0.0)).is_none());
        assert!(swath.left_points().is_empty());
    }

    #[test]
    fn test_boundary_offsets_straddle_the_path() {
        let mut swath = SwathBuilder::new(4.0);
        swath.add_sample(Vector2::new(0.0, 0.0));

        // Driving along +X, the perpendicular is +Y: left lands below, right
        // above
        let (left, right) = swath.add_sample(Vector2::new(10.0, 0.0)).unwrap();
        assert_eq!(left, Vector2::new(10.0, -2.0));
        assert_eq!(right, Vector2::new(10.0, 2.0));
    }

    #[test]
    fn test_sequences_stay_parallel_to_samples() {
        let mut swath = SwathBuilder::new(4.0);
        for i in 0..6 {
            swath.add_sample(Vector2::new(i as f64 * 10.0, 0.0));
        }

        // 6 samples, boundary sequences carry one entry per sample (the
        // first entry duplicating the second)
        assert_eq!(swath.left_points().len(), 6);
        assert_eq!(swath.right_points().len(), 6);
        assert_eq!(swath.left_points()[0], swath.left_points()[1]);
    }

    #[test]
    fn test_mesh_grows_one_quad_per_sample() {
        let mut swath = SwathBuilder::new(4.0);
        for i in 0..6 {
            swath.add_sample(Vector2::new(i as f64 * 10.0, 0.0));
        }

        // 5 boundary-producing samples, each appending one quad of two
        // triangles
        assert_eq!(swath.mesh().num_quads(), 5);
        assert_eq!(swath.mesh().vertices.len(), 6 * 4);

        // Indices reference valid vertices only
        let num_vertices = (swath.mesh().vertices.len() / 2) as u32;
        assert!(swath.mesh().indices.iter().all(|i| *i < num_vertices));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut swath = SwathBuilder::new(4.0);
        swath.add_sample(Vector2::new(0.0, 0.0));
        swath.add_sample(Vector2::new(10.0, 0.0));

        swath.clear();
        assert!(swath.left_points().is_empty());
        assert!(swath.mesh().vertices.is_empty());
        assert!(swath.add_sample(Vector2::new(0.0, 0.0)).is_none());
    }
}
