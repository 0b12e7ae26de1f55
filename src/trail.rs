//! Damped trail chains.
//!
//! A trail is a chain of anchor points dragged behind the membrane center:
//! node 0 seeks the center, node i seeks node i-1, each with its own
//! inertia and a hard cap on how far it may stretch from its target. Node
//! positions and radii are jittered with coherent noise so the chain reads
//! as a living tail rather than a rigid rope. Each node then acts on the
//! surface exactly like a probe shell, using the probe response curve.

use glam::Vec3;

use crate::forces::blend;
use crate::noise::NoiseField;

/// Tunables for one node of a trail chain.
#[derive(Clone, Copy, Debug)]
pub struct TrailProfile {
    /// How quickly the node seeks its target (exponential smoothing rate).
    pub inertia: f32,
    /// Maximum stretch from the target, as a fraction of the adjusted
    /// membrane radius. Clamped to a small positive minimum at
    /// construction so the noise scaling below never divides by zero.
    pub max_distance: f32,
    /// Node radius when fully caught up, as a fraction of the adjusted
    /// radius.
    pub base_radius: f32,
    /// Node radius at full stretch, as a fraction of the adjusted radius.
    pub max_radius: f32,
    /// Strength of the radius jitter.
    pub radius_noise: f32,
    /// Strength of the position jitter.
    pub pos_noise: f32,
    /// Time scale of the jitter.
    pub noise_speed: f32,
}

impl Default for TrailProfile {
    fn default() -> Self {
        Self {
            inertia: 3.0,
            max_distance: 0.5,
            base_radius: 0.3,
            max_radius: 0.6,
            radius_noise: 0.0,
            pos_noise: 0.0,
            noise_speed: 1.0,
        }
    }
}

impl TrailProfile {
    /// Set the seek rate.
    pub fn with_inertia(mut self, inertia: f32) -> Self {
        self.inertia = inertia;
        self
    }

    /// Set the stretch cap (fraction of adjusted radius).
    pub fn with_max_distance(mut self, max_distance: f32) -> Self {
        self.max_distance = max_distance;
        self
    }

    /// Set the caught-up and fully-stretched radii (fractions of adjusted
    /// radius).
    pub fn with_radius(mut self, base: f32, max: f32) -> Self {
        self.base_radius = base;
        self.max_radius = max;
        self
    }

    /// Set position and radius jitter strengths.
    pub fn with_noise(mut self, pos: f32, radius: f32, speed: f32) -> Self {
        self.pos_noise = pos;
        self.radius_noise = radius;
        self.noise_speed = speed;
        self
    }

    pub(crate) fn sanitized(mut self) -> Self {
        self.max_distance = self.max_distance.max(1e-3);
        self
    }
}

/// Runtime state of one trail node.
#[derive(Clone, Copy, Debug)]
pub struct TrailNode {
    /// Noise-free chain position, world space.
    pub base_pos: Vec3,
    /// Jittered position the surface actually reacts to, world space.
    pub final_pos: Vec3,
    /// Membrane-local position, snapshotted on the owning thread.
    pub local_pos: Vec3,
    /// Current node radius, world units.
    pub radius: f32,
}

impl TrailNode {
    pub(crate) fn at(position: Vec3) -> Self {
        Self {
            base_pos: position,
            final_pos: position,
            local_pos: Vec3::ZERO,
            radius: 0.0,
        }
    }
}

/// Capture membrane-local node positions from last tick's world positions.
///
/// Runs in the snapshot phase; the force pass reads only `local_pos`.
pub(crate) fn snapshot_locals(nodes: &mut [TrailNode], center: Vec3) {
    for node in nodes {
        node.local_pos = node.final_pos - center;
    }
}

/// Advance the chain one tick.
///
/// Node i seeks node i-1's base position (node 0 seeks `head`), clamped to
/// its stretch cap. Jitter amplitude scales with how stretched the node
/// currently is, so a caught-up tail rests quietly.
pub(crate) fn update_chain(
    nodes: &mut [TrailNode],
    profiles: &[TrailProfile],
    head: Vec3,
    adjusted_radius: f32,
    time: f32,
    dt: f32,
    noise: &NoiseField,
) {
    let mut target = head;

    for (i, profile) in profiles.iter().enumerate().take(nodes.len()) {
        if i > 0 {
            target = nodes[i - 1].base_pos;
        }

        let mut pos = blend(nodes[i].base_pos, target, profile.inertia, dt);

        let mut stretch = pos.distance(target);
        let max_stretch = profile.max_distance * adjusted_radius;
        if stretch > max_stretch {
            stretch = max_stretch;
            let dir = (pos - target).normalize_or_zero();
            pos = target + dir * stretch;
        }
        nodes[i].base_pos = pos;

        let fi = i as f32;
        let jitter = (stretch / max_stretch) * profile.pos_noise;
        let t = time + fi * profile.noise_speed;
        let mut final_pos = pos;
        final_pos.x += noise.sample2(pos.x + fi, t) * jitter;
        final_pos.y += noise.sample2(pos.y + fi, t) * jitter;
        final_pos.z += noise.sample2(pos.z + fi, t) * jitter;
        nodes[i].final_pos = final_pos;

        // Radius tracks the stretch: a lagging node swells toward its max.
        let reach = stretch / profile.max_distance;
        let radius_jitter = reach * profile.radius_noise;
        let mut radius = adjusted_radius
            * (profile.base_radius
                + (profile.max_radius - profile.base_radius) * reach.clamp(0.0, 1.0));
        radius += noise.sample2(
            final_pos.x + final_pos.y + final_pos.z * profile.noise_speed,
            dt + fi * profile.noise_speed,
        ) * radius_jitter;

        nodes[i].radius += (radius - nodes[i].radius) * (dt * profile.inertia).clamp(0.0, 1.0);
    }
}
