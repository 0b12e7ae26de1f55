//! Solidity as a freeze control.
//!
//! Turbulence roughs up the surface, then solidity ramps to 1 and pins it
//! back to a perfect sphere.
//! Run with: cargo run --example freeze

use membrane::prelude::*;

const DT: f32 = 1.0 / 60.0;

fn main() {
    let mesh = SphereMesh::icosphere(2);
    let config = MembraneConfig::new(0.5)
        .with_turbulence(6.0, 2.0, 0.01)
        .with_noise_seed(42);

    let mut surface = Membrane::new(&mesh, config).expect("valid config");

    for frame in 0..600 {
        let t = frame as f32 * DT;

        // Start freezing at the halfway mark.
        if t > 5.0 {
            surface.set_solidity((t - 5.0) / 2.0);
        }

        surface.tick(DT);

        if frame % 60 == 0 {
            let roughness = surface
                .vertices()
                .iter()
                .map(|v| (v.length() - 0.5).abs())
                .fold(0.0f32, f32::max);
            println!("t={:.2}s  solidity {:.2}  roughness {:.4}", t, surface.config().solidity, roughness);
        }
    }
}
