//! A fingertip poking a membrane.
//!
//! One probe orbits the surface, dipping inside and back out; containment
//! events and surface stats print per second of simulated time.
//! Run with: cargo run --example poke

use membrane::prelude::*;

const DT: f32 = 1.0 / 60.0;

fn main() {
    let mesh = SphereMesh::icosphere(3);
    let config = MembraneConfig::new(0.5)
        .with_multipliers(1.0, 0.5, 1.0)
        .with_vertex_colors(Vec4::new(0.1, 0.1, 0.4, 1.0));

    let mut surface = Membrane::new(&mesh, config).expect("valid config");
    let finger = surface.add_probe(
        Probe::new(Vec3::new(1.0, 0.0, 0.0), 0.05).with_color(Vec4::new(1.0, 0.4, 0.1, 1.0)),
    );

    println!(
        "membrane: {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    for frame in 0..600 {
        let t = frame as f32 * DT;

        // Spiral the fingertip through the surface and back out.
        let reach = 0.3 + 0.4 * (t * 1.3).cos();
        surface.set_probe_position(
            finger,
            Vec3::new(reach * t.cos(), 0.1 * (t * 3.0).sin(), reach * t.sin()),
        );

        for event in surface.tick(DT) {
            match event {
                ProbeEvent::Entered(i) => println!("t={:.2}s  probe {} entered", t, i),
                ProbeEvent::Exited(i) => println!("t={:.2}s  probe {} exited", t, i),
            }
        }

        if frame % 60 == 0 {
            let (min, max) = surface
                .vertices()
                .iter()
                .map(|v| v.length())
                .fold((f32::INFINITY, 0.0f32), |(lo, hi), l| {
                    (lo.min(l), hi.max(l))
                });
            println!("t={:.2}s  surface radius {:.3}..{:.3}", t, min, max);
        }
    }
}
