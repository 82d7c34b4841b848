//! # Coverage Tracking Benchmark

use criterion::{criterion_group, criterion_main, Criterion};

use nalgebra::Vector2;
use sim_lib::cov_track::{CovTrack, Params};

/// Generate a serpentine field pattern: long east/west passes joined by short
/// turns, the worst case for the overlap detector since every turn re-enters
/// covered ground.
fn serpentine(passes: usize, pass_length_m: f64, pass_gap_m: f64, spacing_m: f64) -> Vec<Vector2<f64>> {
    let mut points = Vec::new();

    for pass in 0..passes {
        let y = pass as f64 * pass_gap_m;
        let num_points = (pass_length_m / spacing_m) as usize;

        for i in 0..num_points {
            let x = i as f64 * spacing_m;
            if pass % 2 == 0 {
                points.push(Vector2::new(x, y));
            } else {
                points.push(Vector2::new(pass_length_m - x, y));
            }
        }
    }

    points
}

fn coverage_benchmark(c: &mut Criterion) {
    // Overlapping passes: the gap is smaller than the swath width
    let samples = serpentine(10, 200.0, 4.0, 1.0);

    c.bench_function("CovTrack::proc::serpentine", |b| {
        b.iter(|| {
            let mut cov = CovTrack::with_params(Params::default());
            for p in samples.iter() {
                cov.proc(*p);
            }
            cov.markers().len()
        })
    });

    // A single long straight pass, the no-overlap baseline
    let straight = serpentine(1, 2000.0, 0.0, 1.0);

    c.bench_function("CovTrack::proc::straight", |b| {
        b.iter(|| {
            let mut cov = CovTrack::with_params(Params::default());
            for p in straight.iter() {
                cov.proc(*p);
            }
            cov.markers().len()
        })
    });
}

criterion_group!(benches, coverage_benchmark);
criterion_main!(benches);
