//! Benchmarks for the per-tick solver and its hot-path primitives.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;

use membrane::config::MembraneConfig;
use membrane::curve::{CurveTable, ResponseCurve};
use membrane::mesh::SphereMesh;
use membrane::noise::NoiseField;
use membrane::solver::{SolverState, StepParams, TickSnapshot};

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("solver_step");

    // The pairwise pass is O(N²): each subdivision level quadruples the
    // vertex count and ~16x's the tick cost.
    for level in [1u32, 2, 3] {
        let mesh = SphereMesh::icosphere(level);
        let config = MembraneConfig::new(0.5);
        let snapshot = TickSnapshot::new(StepParams::from_config(
            &config,
            1.0 / 60.0,
            0.0,
            Vec3::ZERO,
        ));

        group.bench_with_input(
            BenchmarkId::new("vertices", mesh.vertex_count()),
            &mesh,
            |b, mesh| {
                let mut state = SolverState::new(mesh.positions(), &config).unwrap();
                b.iter(|| {
                    state.step(black_box(&snapshot));
                });
            },
        );
    }

    group.finish();
}

fn bench_step_with_turbulence(c: &mut Criterion) {
    let mesh = SphereMesh::icosphere(2);
    let config = MembraneConfig::new(0.5).with_turbulence(4.0, 2.0, 0.02);
    let snapshot = TickSnapshot::new(StepParams::from_config(
        &config,
        1.0 / 60.0,
        1.5,
        Vec3::ZERO,
    ));
    let mut state = SolverState::new(mesh.positions(), &config).unwrap();

    c.bench_function("solver_step_turbulent_162", |b| {
        b.iter(|| {
            state.step(black_box(&snapshot));
        });
    });
}

fn bench_curve_table(c: &mut Criterion) {
    let table = CurveTable::bake(&ResponseCurve::smooth(1.0, 0.0), 1024).unwrap();

    c.bench_function("curve_table_sample", |b| {
        let mut x = 0.0f32;
        b.iter(|| {
            x = (x + 0.37) % 1.3;
            black_box(table.sample(black_box(x)))
        })
    });
}

fn bench_noise(c: &mut Criterion) {
    let noise = NoiseField::new(42);

    c.bench_function("noise_sample2", |b| {
        let mut x = 0.0f32;
        b.iter(|| {
            x += 0.17;
            black_box(noise.sample2(black_box(x), black_box(x * 0.5)))
        })
    });

    c.bench_function("noise_sample3", |b| {
        let mut x = 0.0f32;
        b.iter(|| {
            x += 0.17;
            black_box(noise.sample3(black_box(x), black_box(x * 0.5), black_box(x * 0.25)))
        })
    });
}

criterion_group!(
    benches,
    bench_step,
    bench_step_with_turbulence,
    bench_curve_table,
    bench_noise
);
criterion_main!(benches);
