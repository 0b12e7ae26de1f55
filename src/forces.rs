//! Per-vertex force channels and inertia smoothing.
//!
//! Each vertex carries one smoothed vector per force source: radial
//! (restoring), atomic (pairwise), probe (point influence), and trail.
//! Channels are never integrated as velocities; every tick each channel is
//! re-targeted from scratch and pulled toward the fresh target by
//! [`blend`]. The channel therefore lags a fast-moving target by roughly
//! `1 / rate` seconds but can never overshoot it.

use glam::Vec3;

/// Exponentially smooth `current` toward `target`.
///
/// The blend factor is `clamp01(dt * rate)`, so a frame stall (large `dt`)
/// lands exactly on the target instead of shooting past it. The result is
/// always componentwise between `current` and `target`.
#[inline]
pub fn blend(current: Vec3, target: Vec3, rate: f32, dt: f32) -> Vec3 {
    current.lerp(target, (dt * rate).clamp(0.0, 1.0))
}

/// The smoothed force vectors for every vertex, one `Vec3` per channel.
///
/// All four buffers stay the same length for the life of a simulation
/// instance; the trail buffer is allocated even when unused so buffer
/// lengths can be checked as a single invariant.
#[derive(Clone, Debug)]
pub struct ForceChannels {
    /// Restoring force toward the rest position.
    pub radial: Vec<Vec3>,
    /// Accumulated pairwise vertex-to-vertex force.
    pub atomic: Vec<Vec3>,
    /// Force from moving point probes.
    pub probe: Vec<Vec3>,
    /// Force from the trail chain.
    pub trail: Vec<Vec3>,
}

impl ForceChannels {
    /// Allocate zeroed channels for `len` vertices.
    pub fn new(len: usize) -> Self {
        Self {
            radial: vec![Vec3::ZERO; len],
            atomic: vec![Vec3::ZERO; len],
            probe: vec![Vec3::ZERO; len],
            trail: vec![Vec3::ZERO; len],
        }
    }

    /// Number of vertices the channels cover.
    #[inline]
    pub fn len(&self) -> usize {
        self.radial.len()
    }

    /// Whether the channels are empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.radial.is_empty()
    }

    /// Zero every channel. Used when the surface is reset.
    pub fn reset(&mut self) {
        self.radial.fill(Vec3::ZERO);
        self.atomic.fill(Vec3::ZERO);
        self.probe.fill(Vec3::ZERO);
        self.trail.fill(Vec3::ZERO);
    }

    /// Sum of all channels at a vertex, excluding the trail channel.
    #[inline]
    pub fn composite(&self, index: usize) -> Vec3 {
        self.radial[index] + self.atomic[index] + self.probe[index]
    }
}
