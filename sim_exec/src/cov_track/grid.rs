//! # Spatial path index
//!
//! A sparse 2D grid mapping quantised cell coordinates to chains of
//! contiguous path-sample runs. The grid lets the coverage detector find the
//! historical samples near a query point without walking the full trajectory.
//!
//! Cell coordinates are the floor of the raw coordinate divided by the cell
//! size, for both signs. Inserting and looking up with the same coordinates
//! therefore always resolves the same cell, including for negative and
//! fractional coordinates.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::Serialize;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Running bounds of the occupied cells.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct GridBounds {
    pub min_cx: i64,
    pub max_cx: i64,
    pub min_cy: i64,
    pub max_cy: i64,
}

/// A sparse grid of lazily created cells.
///
/// A cell is created on first insertion and each key owns exactly one value.
#[derive(Clone, Debug, Default)]
pub struct CellGrid<T> {
    cells: HashMap<(i64, i64), T>,
    bounds: Option<GridBounds>,
}

/// A contiguous run of path samples, appended without a gap in sequence
/// order.
#[derive(Clone, Debug, Serialize)]
pub struct ChunkRun {
    /// Sequence index of the first sample in the run.
    pub start_seq: usize,

    /// Sequence index of the last sample in the run.
    pub finish_seq: usize,

    /// Positions of the samples of this run, in sequence order.
    pub points_m: Vec<Vector2<f64>>,
}

/// The chain of sample runs owned by one grid cell.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PathChunk {
    runs: Vec<ChunkRun>,
}

/// The spatial index over all path samples.
#[derive(Clone, Debug)]
pub struct SpatialPathIndex {
    grid: CellGrid<PathChunk>,
    cell_size_m: f64,
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Quantise a raw coordinate into a cell coordinate.
pub fn cell_coord(value_m: f64, cell_size_m: f64) -> i64 {
    (value_m / cell_size_m).floor() as i64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<T> CellGrid<T> {
    pub fn new() -> Self {
        CellGrid {
            cells: HashMap::new(),
            bounds: None,
        }
    }

    /// Set the value of a cell, replacing any existing value.
    pub fn set(&mut self, cx: i64, cy: i64, value: T) {
        self.cells.insert((cx, cy), value);
        self.update_bounds(cx, cy);
    }

    pub fn get(&self, cx: i64, cy: i64) -> Option<&T> {
        self.cells.get(&(cx, cy))
    }

    pub fn get_mut(&mut self, cx: i64, cy: i64) -> Option<&mut T> {
        self.cells.get_mut(&(cx, cy))
    }

    /// Get the cell's value, inserting the given default first if the cell is
    /// empty.
    pub fn get_or_insert_with<F: FnOnce() -> T>(&mut self, cx: i64, cy: i64, f: F) -> &mut T {
        self.update_bounds(cx, cy);
        self.cells.entry((cx, cy)).or_insert_with(f)
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Bounds of the occupied cells, `None` while the grid is empty.
    pub fn bounds(&self) -> Option<&GridBounds> {
        self.bounds.as_ref()
    }

    /// Drop all cells.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.bounds = None;
    }

    fn update_bounds(&mut self, cx: i64, cy: i64) {
        match self.bounds {
            Some(ref mut b) => {
                b.min_cx = b.min_cx.min(cx);
                b.max_cx = b.max_cx.max(cx);
                b.min_cy = b.min_cy.min(cy);
                b.max_cy = b.max_cy.max(cy);
            }
            None => {
                self.bounds = Some(GridBounds {
                    min_cx: cx,
                    max_cx: cx,
                    min_cy: cy,
                    max_cy: cy,
                });
            }
        }
    }
}

impl PathChunk {
    /// Append a sample to the chunk.
    ///
    /// The sample joins the run whose last sequence index is exactly one less
    /// than `seq`. If no run continues, a new run is started.
    pub fn append(&mut self, point_m: Vector2<f64>, seq: usize) {
        for run in self.runs.iter_mut() {
            if run.finish_seq + 1 == seq {
                run.points_m.push(point_m);
                run.finish_seq = seq;
                return;
            }
        }

        self.runs.push(ChunkRun {
            start_seq: seq,
            finish_seq: seq,
            points_m: vec![point_m],
        });
    }

    /// The runs of this chunk.
    pub fn runs(&self) -> &[ChunkRun] {
        &self.runs
    }
}

impl ChunkRun {
    /// Iterate over `(seq, position)` pairs of the run.
    pub fn iter_seq(&self) -> impl Iterator<Item = (usize, &Vector2<f64>)> {
        self.points_m
            .iter()
            .enumerate()
            .map(move |(i, p)| (self.start_seq + i, p))
    }
}

impl SpatialPathIndex {
    /// Create a new empty index with the given cell size.
    pub fn new(cell_size_m: f64) -> Self {
        SpatialPathIndex {
            grid: CellGrid::new(),
            cell_size_m,
        }
    }

    /// Index a path sample under its position's cell.
    pub fn insert(&mut self, point_m: Vector2<f64>, seq: usize) {
        let cx = cell_coord(point_m[0], self.cell_size_m);
        let cy = cell_coord(point_m[1], self.cell_size_m);

        self.grid
            .get_or_insert_with(cx, cy, PathChunk::default)
            .append(point_m, seq);
    }

    /// The chunk covering the given position, or `None` if no sample has been
    /// indexed there.
    pub fn lookup(&self, x_m: f64, y_m: f64) -> Option<&PathChunk> {
        self.grid.get(
            cell_coord(x_m, self.cell_size_m),
            cell_coord(y_m, self.cell_size_m),
        )
    }

    /// Iterate over the chunks of every cell intersecting the axis-aligned
    /// box `[min_m, max_m]`.
    pub fn chunks_in_box(
        &self,
        min_m: Vector2<f64>,
        max_m: Vector2<f64>,
    ) -> impl Iterator<Item = &PathChunk> {
        let cx0 = cell_coord(min_m[0], self.cell_size_m);
        let cx1 = cell_coord(max_m[0], self.cell_size_m);
        let cy0 = cell_coord(min_m[1], self.cell_size_m);
        let cy1 = cell_coord(max_m[1], self.cell_size_m);

        let grid = &self.grid;
        (cx0..=cx1).flat_map(move |cx| (cy0..=cy1).filter_map(move |cy| grid.get(cx, cy)))
    }

    /// Number of occupied cells.
    pub fn occupied_cells(&self) -> usize {
        self.grid.len()
    }

    /// Drop all indexed samples.
    pub fn clear(&mut self) {
        self.grid.clear();
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_negative_coordinate_consistency() {
        let mut index = SpatialPathIndex::new(50.0);

        index.insert(Vector2::new(-1.0, -1.0), 0);

        // Lookup with the same coordinates resolves the same cell
        let chunk = index.lookup(-1.0, -1.0).expect("cell should be occupied");
        assert_eq!(chunk.runs().len(), 1);
        assert_eq!(chunk.runs()[0].points_m[0], Vector2::new(-1.0, -1.0));

        // Any fractional or negative coordinate quantising to the same cell
        // keys identically
        assert_eq!(cell_coord(-1.0, 50.0), cell_coord(-49.9, 50.0));
        assert_eq!(cell_coord(-1.0, 50.0), -1);
        assert_eq!(cell_coord(0.5, 50.0), 0);
        assert_eq!(cell_coord(49.9, 50.0), 0);
        assert_eq!(cell_coord(50.0, 50.0), 1);
        assert_eq!(cell_coord(-50.0, 50.0), -1);
        assert_eq!(cell_coord(-50.1, 50.0), -2);
    }

    #[test]
    fn test_contiguous_samples_share_a_run() {
        let mut chunk = PathChunk::default();
        for seq in 0..5 {
            chunk.append(Vector2::new(seq as f64, 0.0), seq);
        }

        assert_eq!(chunk.runs().len(), 1);
        assert_eq!(chunk.runs()[0].start_seq, 0);
        assert_eq!(chunk.runs()[0].finish_seq, 4);
    }

    #[test]
    fn test_sequence_gap_starts_new_run() {
        let mut chunk = PathChunk::default();
        chunk.append(Vector2::new(0.0, 0.0), 0);
        chunk.append(Vector2::new(1.0, 0.0), 1);

        // The vehicle left the cell and came back later
        chunk.append(Vector2::new(2.0, 0.0), 10);
        chunk.append(Vector2::new(3.0, 0.0), 11);

        assert_eq!(chunk.runs().len(), 2);
        assert_eq!(chunk.runs()[0].finish_seq, 1);
        assert_eq!(chunk.runs()[1].start_seq, 10);
        assert_eq!(chunk.runs()[1].finish_seq, 11);
    }

    #[test]
    fn test_grid_bounds_track_insertions() {
        let mut grid: CellGrid<u32> = CellGrid::new();
        assert!(grid.bounds().is_none());

        grid.set(2, 3, 1);
        grid.set(-5, 7, 2);

        let bounds = grid.bounds().unwrap();
        assert_eq!(bounds.min_cx, -5);
        assert_eq!(bounds.max_cx, 2);
        assert_eq!(bounds.min_cy, 3);
        assert_eq!(bounds.max_cy, 7);

        grid.clear();
        assert!(grid.bounds().is_none());
        assert!(grid.is_empty());
    }

    #[test]
    fn test_chunks_in_box() {
        let mut index = SpatialPathIndex::new(10.0);
        index.insert(Vector2::new(5.0, 5.0), 0);
        index.insert(Vector2::new(25.0, 5.0), 1);
        index.insert(Vector2::new(95.0, 95.0), 2);

        let found: Vec<_> = index
            .chunks_in_box(Vector2::new(0.0, 0.0), Vector2::new(30.0, 10.0))
            .collect();
        assert_eq!(found.len(), 2);
    }
}
