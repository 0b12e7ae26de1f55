//! # Membrane - touch-reactive surface deformation
//!
//! A force-field simulation for deforming sphere surfaces. Each tick,
//! every vertex of an icosphere mesh is pulled by superposed force fields -
//! a radial restoring force, an O(N²) pairwise "atomic" force, moving
//! point probes (fingertips), and an optional damped trail chain - and
//! integrated with per-channel exponential smoothing. The heavy pairwise
//! pass runs on a background worker so the host's frame loop only pays for
//! a buffer publish and an input snapshot.
//!
//! ## Quick Start
//!
//! ```ignore
//! use membrane::prelude::*;
//!
//! let mesh = SphereMesh::icosphere(3);
//! let mut surface = Membrane::new(&mesh, MembraneConfig::new(0.5))?;
//! let finger = surface.add_probe(Probe::new(Vec3::ZERO, 0.02));
//!
//! loop {
//!     surface.set_probe_position(finger, fingertip());
//!     for event in surface.tick(frame_dt) {
//!         match event {
//!             ProbeEvent::Entered(i) => play_pop(*i),
//!             ProbeEvent::Exited(i) => play_pluck(*i),
//!         }
//!     }
//!     upload_mesh(surface.vertex_bytes(), surface.color_bytes());
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Force channels
//!
//! Each vertex carries four independently smoothed force vectors. Channels
//! are re-targeted from scratch every tick and blended toward the fresh
//! target at `clamp01(dt * inertia)` - no velocity is ever integrated, so
//! the surface is unconditionally stable but lags fast-moving targets.
//!
//! ### Probes
//!
//! A [`Probe`] is an external moving point that locally deforms the
//! surface: pushing a bump out when contained, carving a dimple in when
//! straddling or outside the shell. Containment transitions surface as
//! [`ProbeEvent`]s, drained once per tick.
//!
//! ### Response curves
//!
//! Force strength over normalized distance is shaped by a
//! [`ResponseCurve`], baked once into a [`CurveTable`] for O(1) sampling
//! inside the pairwise loop.
//!
//! ### Solidity
//!
//! A 0-1 control blending the deformed surface back toward its rest shape;
//! 1 freezes it solid.
//!
//! ### The pipeline
//!
//! [`Membrane::tick`] is phase A (publish + snapshot, on the calling
//! thread); the force step is phase B, on a dedicated worker. One
//! [`solver::SolverState`] is moved back and forth, so exactly one step is
//! in flight at a time. Hosts that want synchronous control can drive a
//! `SolverState` directly.

pub mod config;
pub mod curve;
pub mod error;
pub mod forces;
mod membrane;
pub mod mesh;
pub mod noise;
pub mod probe;
pub mod solver;
pub mod time;
pub mod trail;

pub use bytemuck;
pub use config::{MembraneConfig, MIN_RADIUS, TABLE_RESOLUTION};
pub use curve::{CurveTable, Keyframe, ResponseCurve};
pub use error::ConfigError;
pub use forces::{blend, ForceChannels};
pub use glam::{Vec2, Vec3, Vec4};
pub use membrane::Membrane;
pub use mesh::SphereMesh;
pub use noise::NoiseField;
pub use probe::{Probe, ProbeEvent};
pub use time::SimClock;
pub use trail::TrailProfile;

/// Convenient re-exports for common usage.
///
/// # Usage
///
/// ```ignore
/// use membrane::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::MembraneConfig;
    pub use crate::curve::{CurveTable, Keyframe, ResponseCurve};
    pub use crate::error::ConfigError;
    pub use crate::membrane::Membrane;
    pub use crate::mesh::SphereMesh;
    pub use crate::noise::NoiseField;
    pub use crate::probe::{Probe, ProbeEvent};
    pub use crate::time::SimClock;
    pub use crate::trail::TrailProfile;
    pub use crate::{Vec2, Vec3, Vec4};
}
