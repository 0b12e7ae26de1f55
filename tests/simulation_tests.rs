//! End-to-end tests against the public API.
//!
//! These exercise the full pipeline - worker thread, snapshot phase, and
//! solver - the way a host application would, with a fixed delta so every
//! run is deterministic.

use membrane::prelude::*;
use rand::{Rng, SeedableRng};

const DT: f32 = 1.0 / 60.0;

/// The spec's baseline scenario: a bare icosahedron with only the radial
/// channel live.
fn radial_only(radius: f32) -> MembraneConfig {
    MembraneConfig::new(radius)
        .with_multipliers(1.0, 0.0, 0.0)
        .with_inertia(10.0, 0.0, 0.0)
}

fn max_distance_from_rest(surface: &Membrane, mesh: &SphereMesh, radius: f32) -> f32 {
    surface
        .vertices()
        .iter()
        .zip(mesh.positions())
        .map(|(v, o)| v.distance(*o * radius))
        .fold(0.0, f32::max)
}

#[test]
fn icosahedron_at_rest_stays_at_rest() {
    // 12 vertices, radius 1, radial inertia 10, everything else silent,
    // one disabled probe along for the ride: after 100 ticks the surface
    // must still sit on original * radius.
    let mesh = SphereMesh::icosphere(0);
    let mut surface = Membrane::new(&mesh, radial_only(1.0)).unwrap();
    let probe = surface.add_probe(Probe::new(Vec3::new(0.2, 0.0, 0.0), 0.05));
    surface.set_probe_enabled(probe, false);

    for _ in 0..100 {
        surface.tick(DT);
    }

    assert!(max_distance_from_rest(&surface, &mesh, 1.0) < 1e-3);
}

#[test]
fn radius_pulse_settles_monotonically() {
    // Kick the radius pulse and watch the surface chase the shrinking
    // target. Once past the initial transient, the per-tick displacement
    // must only shrink.
    let mesh = SphereMesh::icosphere(1);
    let mut surface = Membrane::new(&mesh, radial_only(1.0)).unwrap();
    surface.set_radius_multiplier(1.0);

    let mut prev = surface.vertices().to_vec();
    let mut deltas = Vec::new();
    for _ in 0..300 {
        surface.tick(DT);
        let delta: f32 = surface
            .vertices()
            .iter()
            .zip(&prev)
            .map(|(a, b)| a.distance(*b))
            .fold(0.0, f32::max);
        deltas.push(delta);
        prev = surface.vertices().to_vec();
    }

    let early: f32 = deltas[50..70].iter().copied().fold(0.0, f32::max);
    let mid: f32 = deltas[150..170].iter().copied().fold(0.0, f32::max);
    let late: f32 = deltas[280..300].iter().copied().fold(0.0, f32::max);
    assert!(early > mid, "early {} mid {}", early, mid);
    assert!(mid > late, "mid {} late {}", mid, late);
}

#[test]
fn solidity_one_pins_surface_exactly() {
    let mesh = SphereMesh::icosphere(1);
    let config = radial_only(1.0).with_solidity(1.0);
    let mut surface = Membrane::new(&mesh, config).unwrap();

    // An enabled probe grinding against the surface changes nothing.
    surface.add_probe(Probe::new(Vec3::new(0.5, 0.0, 0.0), 0.4));

    for _ in 0..10 {
        surface.tick(DT);
    }

    for (v, o) in surface.vertices().iter().zip(mesh.positions()) {
        // radius_multiplier is 0 throughout, so rest is original * radius.
        assert_eq!(*v, *o * 1.0);
    }
}

#[test]
fn probe_crossing_in_fires_exactly_one_enter() {
    let mesh = SphereMesh::icosphere(0);
    let mut surface = Membrane::new(&mesh, radial_only(1.0)).unwrap();
    let probe = surface.add_probe(Probe::new(Vec3::new(2.0, 0.0, 0.0), 0.1));

    assert!(surface.tick(DT).is_empty());

    // One big jump from well outside to well inside.
    surface.set_probe_position(probe, Vec3::new(0.1, 0.0, 0.0));
    assert_eq!(surface.tick(DT), &[ProbeEvent::Entered(probe)]);

    let mut later_events = 0;
    for _ in 0..50 {
        later_events += surface.tick(DT).len();
    }
    assert_eq!(later_events, 0);
}

#[test]
fn disabled_probe_exerts_no_force() {
    let mesh = SphereMesh::icosphere(1);

    let deform = |enabled: bool| {
        let config = MembraneConfig::new(1.0)
            .with_multipliers(0.0, 0.0, 1.0)
            .with_inertia(0.0, 0.0, 30.0);
        let mut surface = Membrane::new(&mesh, config).unwrap();
        let probe = surface.add_probe(Probe::new(Vec3::new(1.1, 0.0, 0.0), 0.1));
        surface.set_probe_enabled(probe, enabled);
        for _ in 0..20 {
            surface.tick(DT);
        }
        max_distance_from_rest(&surface, &mesh, 1.0)
    };

    assert!(deform(false) < 1e-6);
    assert!(deform(true) > 1e-3);
}

#[test]
fn trail_chain_deforms_surface() {
    let mesh = SphereMesh::icosphere(1);
    let config = MembraneConfig::new(1.0)
        .with_multipliers(0.0, 0.0, 0.0)
        .with_trails(vec![
            TrailProfile::default().with_radius(0.9, 1.1),
            TrailProfile::default().with_radius(0.7, 0.9),
        ]);
    let mut surface = Membrane::new(&mesh, config).unwrap();

    // Drag the membrane center around so the trail lags across the
    // surface from inside.
    for frame in 0..120 {
        let t = frame as f32 * DT;
        surface.set_center(Vec3::new(t.sin() * 0.5, 0.0, t.cos() * 0.5));
        surface.tick(DT);
    }

    let moved = surface
        .vertices()
        .iter()
        .zip(mesh.positions())
        .map(|(v, o)| v.distance(*o))
        .fold(0.0, f32::max);
    assert!(moved > 1e-3, "trail never touched the surface: {}", moved);
}

#[test]
fn blend_stays_bounded_for_random_inputs() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);

    for _ in 0..1000 {
        let current = Vec3::new(rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0), 0.0);
        let target = Vec3::new(rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0), 0.0);
        let rate = rng.gen_range(0.0..100.0);
        let dt = rng.gen_range(0.0..2.0);

        let result = membrane::blend(current, target, rate, dt);
        for axis in 0..2 {
            let (a, b) = (current[axis], target[axis]);
            assert!(
                result[axis] >= a.min(b) && result[axis] <= a.max(b),
                "overshoot: {} not between {} and {}",
                result[axis],
                a,
                b
            );
        }
    }
}

#[test]
fn curve_table_out_of_range_equals_clamped() {
    let curve = ResponseCurve::smooth(1.0, 0.0);
    let table = CurveTable::bake(&curve, 1024).unwrap();

    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    for _ in 0..1000 {
        let x = rng.gen_range(-10.0..10.0f32);
        assert_eq!(table.sample(x), table.sample(x.clamp(0.0, 1.0)));
    }
}
