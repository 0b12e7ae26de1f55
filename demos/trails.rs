//! A membrane dragging a noisy trail chain behind it.
//!
//! The center sweeps a circle; three trail nodes lag behind and bulge the
//! surface as they pass through it.
//! Run with: cargo run --example trails

use membrane::prelude::*;

const DT: f32 = 1.0 / 60.0;

fn main() {
    let mesh = SphereMesh::icosphere(2);
    let config = MembraneConfig::new(0.5)
        .with_multipliers(1.0, 0.0, 0.0)
        .with_noise_seed(7)
        .with_trails(vec![
            TrailProfile::default()
                .with_max_distance(0.4)
                .with_radius(0.5, 0.8)
                .with_noise(0.02, 0.01, 2.0),
            TrailProfile::default()
                .with_max_distance(0.5)
                .with_radius(0.4, 0.7)
                .with_noise(0.03, 0.01, 2.0),
            TrailProfile::default()
                .with_max_distance(0.6)
                .with_radius(0.3, 0.6)
                .with_noise(0.04, 0.02, 2.0),
        ]);

    let mut surface = Membrane::new(&mesh, config).expect("valid config");

    for frame in 0..600 {
        let t = frame as f32 * DT;
        surface.set_center(Vec3::new(t.sin() * 0.4, 0.0, t.cos() * 0.4));
        surface.tick(DT);

        if frame % 60 == 0 {
            let bulge = surface
                .vertices()
                .iter()
                .map(|v| v.length())
                .fold(0.0f32, f32::max);
            println!("t={:.2}s  center {:?}  max radius {:.3}", t, surface.center(), bulge);
        }
    }
}
