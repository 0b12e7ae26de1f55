//! Membrane configuration.
//!
//! All tunables live in [`MembraneConfig`]: force multipliers, per-channel
//! inertia rates, turbulence, the response curves each force channel is
//! shaped by, and the trail chain profiles. Configure with method chaining:
//!
//! ```ignore
//! use membrane::prelude::*;
//!
//! let config = MembraneConfig::new(0.5)
//!     .with_solidity(0.0)
//!     .with_turbulence(4.0, 2.0, 0.01)
//!     .with_vertex_colors(Vec4::new(0.1, 0.1, 0.4, 1.0));
//! ```
//!
//! Validation happens once, in `Membrane::new` / `SolverState::new`; the
//! per-tick loop trusts the config and performs no range checks of its own.

use glam::Vec4;

use crate::curve::ResponseCurve;
use crate::error::ConfigError;
use crate::trail::TrailProfile;

/// Smallest permitted membrane radius. Radii below this are rejected at
/// construction and clamped in the runtime setter, keeping the normalized
/// distance divisions in the force loops away from zero.
pub const MIN_RADIUS: f32 = 1e-3;

/// Default resolution of the baked force-curve tables.
pub const TABLE_RESOLUTION: usize = 1024;

/// Tunable parameters for a membrane surface.
///
/// Fields may be edited directly or through the `with_*` builders. All
/// values are free to change between ticks; none may change during one.
#[derive(Clone, Debug)]
pub struct MembraneConfig {
    /// Rest radius of the sphere, world units.
    pub radius: f32,
    /// Transient radius pulse. The effective ("adjusted") radius each tick
    /// is `radius * (1 + radius_multiplier)`; the pulse decays toward zero
    /// on its own every tick.
    pub radius_multiplier: f32,
    /// 0 = fully fluid, 1 = surface pinned to its rest shape.
    pub solidity: f32,

    /// Scale on the restoring force.
    pub radial_multiplier: f32,
    /// Scale on the pairwise vertex force.
    pub atomic_multiplier: f32,
    /// Scale on probe forces.
    pub probe_multiplier: f32,
    /// Scale on trail-node forces.
    pub trail_multiplier: f32,

    /// Smoothing rate of the radial channel.
    pub radial_inertia: f32,
    /// Smoothing rate of the atomic channel.
    pub atomic_inertia: f32,
    /// Smoothing rate of the probe channel.
    pub probe_inertia: f32,
    /// Smoothing rate of the trail channel.
    pub trail_inertia: f32,

    /// Spatial frequency of the turbulence noise.
    pub turbulence_scale: f32,
    /// Temporal frequency of the turbulence noise.
    pub turbulence_speed: f32,
    /// Amplitude of the turbulence added to the radial force.
    pub turbulence_multiplier: f32,
    /// Whether turbulence is applied at all.
    pub vertex_noise: bool,

    /// Whether per-vertex colors are computed.
    pub vertex_colors: bool,
    /// Color every vertex resets to before probe blending.
    pub base_color: Vec4,

    /// Lower bound on a probe's effective radius, as a fraction of the
    /// adjusted membrane radius.
    pub min_probe_fraction: f32,

    /// Response curve of the restoring force over normalized distance.
    pub radial_curve: ResponseCurve,
    /// Response curve of the pairwise force.
    pub atomic_curve: ResponseCurve,
    /// Response curve of probe and trail forces.
    pub probe_curve: ResponseCurve,
    /// Bucket count of the baked curve tables.
    pub table_resolution: usize,

    /// Seed for the turbulence/trail noise field.
    pub noise_seed: u64,

    /// Trail chain profiles; empty means no trail channel.
    pub trails: Vec<TrailProfile>,
}

impl MembraneConfig {
    /// Create a configuration with the given rest radius and the default
    /// force shaping.
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            radius_multiplier: 0.0,
            solidity: 0.0,
            radial_multiplier: 1.0,
            atomic_multiplier: 1.0,
            probe_multiplier: 1.0,
            trail_multiplier: 5.0,
            radial_inertia: 2.0,
            atomic_inertia: 2.0,
            probe_inertia: 2.0,
            trail_inertia: 3.0,
            turbulence_scale: 1.0,
            turbulence_speed: 1.0,
            turbulence_multiplier: 0.0,
            vertex_noise: false,
            vertex_colors: false,
            base_color: Vec4::ONE,
            min_probe_fraction: 0.5,
            radial_curve: ResponseCurve::linear(0.0, 1.0),
            atomic_curve: ResponseCurve::falloff(0.05),
            probe_curve: ResponseCurve::falloff(1.0),
            table_resolution: TABLE_RESOLUTION,
            noise_seed: 0,
            trails: Vec::new(),
        }
    }

    /// Set the initial solidity (clamped to [0, 1]).
    pub fn with_solidity(mut self, solidity: f32) -> Self {
        self.solidity = solidity.clamp(0.0, 1.0);
        self
    }

    /// Set the per-channel force multipliers (radial, atomic, probe).
    pub fn with_multipliers(mut self, radial: f32, atomic: f32, probe: f32) -> Self {
        self.radial_multiplier = radial;
        self.atomic_multiplier = atomic;
        self.probe_multiplier = probe;
        self
    }

    /// Set the per-channel inertia rates (radial, atomic, probe).
    pub fn with_inertia(mut self, radial: f32, atomic: f32, probe: f32) -> Self {
        self.radial_inertia = radial;
        self.atomic_inertia = atomic;
        self.probe_inertia = probe;
        self
    }

    /// Enable turbulence with the given spatial scale, speed, and
    /// amplitude.
    pub fn with_turbulence(mut self, scale: f32, speed: f32, multiplier: f32) -> Self {
        self.turbulence_scale = scale;
        self.turbulence_speed = speed;
        self.turbulence_multiplier = multiplier;
        self.vertex_noise = true;
        self
    }

    /// Enable vertex colors with the given base color.
    pub fn with_vertex_colors(mut self, base_color: Vec4) -> Self {
        self.vertex_colors = true;
        self.base_color = base_color;
        self
    }

    /// Set the force response curves (radial, atomic, probe).
    pub fn with_curves(
        mut self,
        radial: ResponseCurve,
        atomic: ResponseCurve,
        probe: ResponseCurve,
    ) -> Self {
        self.radial_curve = radial;
        self.atomic_curve = atomic;
        self.probe_curve = probe;
        self
    }

    /// Set the baked table resolution.
    pub fn with_table_resolution(mut self, resolution: usize) -> Self {
        self.table_resolution = resolution;
        self
    }

    /// Set the noise seed.
    pub fn with_noise_seed(mut self, seed: u64) -> Self {
        self.noise_seed = seed;
        self
    }

    /// Attach a trail chain. Profiles are ordered head to tail.
    pub fn with_trails(mut self, profiles: Vec<TrailProfile>) -> Self {
        self.trails = profiles;
        self
    }

    /// Check the configuration for values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.radius.is_finite() || self.radius < MIN_RADIUS {
            return Err(ConfigError::InvalidRadius(self.radius));
        }
        if self.table_resolution == 0 {
            return Err(ConfigError::ZeroTableResolution);
        }
        Ok(())
    }
}

impl Default for MembraneConfig {
    fn default() -> Self {
        Self::new(1.0)
    }
}
