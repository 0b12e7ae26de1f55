//! The per-tick force solver.
//!
//! One [`step`](SolverState::step) consumes an immutable [`TickSnapshot`]
//! and advances every vertex through the force stages in strict order:
//! radial restoring force, O(N²) pairwise "atomic" force, probe force,
//! trail force, then composite-and-solidify. Vertices are updated in place
//! as the loop walks the buffer, so later vertices see earlier vertices'
//! fresh positions within the same tick - changing that order changes
//! observable trajectories, which is why the pairwise pass stays a full
//! sequential sum with no spatial partitioning.
//!
//! [`SolverState`] owns every buffer the solver touches and has no opinion
//! about threads. [`crate::Membrane`] moves one through its two-phase
//! pipeline; hosts that want synchronous, single-threaded stepping can
//! drive a `SolverState` directly.

use glam::{Vec3, Vec4};

use crate::config::MembraneConfig;
use crate::curve::CurveTable;
use crate::error::ConfigError;
use crate::forces::{blend, ForceChannels};
use crate::noise::NoiseField;
use crate::probe::ProbeSnapshot;
use crate::trail::{self, TrailNode, TrailProfile};

/// Scalar inputs for one tick, captured on the owning thread.
#[derive(Clone, Copy, Debug)]
pub struct StepParams {
    /// Delta time for this tick, seconds.
    pub dt: f32,
    /// Simulation time at the snapshot, seconds.
    pub time: f32,
    /// Rest radius.
    pub radius: f32,
    /// Radius with the transient pulse applied.
    pub adjusted_radius: f32,
    /// Blend toward the rest shape applied after force composition.
    pub solidity: f32,

    /// Force multipliers.
    pub radial_multiplier: f32,
    pub atomic_multiplier: f32,
    pub probe_multiplier: f32,
    pub trail_multiplier: f32,

    /// Channel smoothing rates.
    pub radial_inertia: f32,
    pub atomic_inertia: f32,
    pub probe_inertia: f32,
    pub trail_inertia: f32,

    /// Turbulence shaping.
    pub turbulence_scale: f32,
    pub turbulence_speed: f32,
    pub turbulence_multiplier: f32,
    pub vertex_noise: bool,

    /// Color handling.
    pub vertex_colors: bool,
    pub base_color: Vec4,

    /// Lower bound on probe radius as a fraction of the adjusted radius.
    pub min_probe_fraction: f32,

    /// Membrane center in world space (trail chains seek this).
    pub center: Vec3,
}

impl StepParams {
    /// Build tick params from a config, with the adjusted radius derived
    /// from the config's current radius pulse.
    pub fn from_config(config: &MembraneConfig, dt: f32, time: f32, center: Vec3) -> Self {
        Self {
            dt,
            time,
            radius: config.radius,
            adjusted_radius: config.radius * (1.0 + config.radius_multiplier),
            solidity: config.solidity,
            radial_multiplier: config.radial_multiplier,
            atomic_multiplier: config.atomic_multiplier,
            probe_multiplier: config.probe_multiplier,
            trail_multiplier: config.trail_multiplier,
            radial_inertia: config.radial_inertia,
            atomic_inertia: config.atomic_inertia,
            probe_inertia: config.probe_inertia,
            trail_inertia: config.trail_inertia,
            turbulence_scale: config.turbulence_scale,
            turbulence_speed: config.turbulence_speed,
            turbulence_multiplier: config.turbulence_multiplier,
            vertex_noise: config.vertex_noise,
            vertex_colors: config.vertex_colors,
            base_color: config.base_color,
            min_probe_fraction: config.min_probe_fraction,
            center,
        }
    }
}

/// Everything phase B needs for one tick: scalar params plus the probe
/// snapshots. Reused across ticks to avoid per-tick allocation.
#[derive(Clone, Debug)]
pub struct TickSnapshot {
    /// Scalar inputs.
    pub params: StepParams,
    /// One snapshot per probe, in probe-list order.
    pub probes: Vec<ProbeSnapshot>,
}

impl TickSnapshot {
    /// A snapshot with no probes.
    pub fn new(params: StepParams) -> Self {
        Self {
            params,
            probes: Vec::new(),
        }
    }
}

/// Owned simulation state: vertex buffers, force channels, baked tables,
/// noise, and the trail chain.
#[derive(Clone, Debug)]
pub struct SolverState {
    original: Vec<Vec3>,
    current: Vec<Vec3>,
    colors: Vec<Vec4>,
    forces: ForceChannels,
    trails: Vec<TrailNode>,
    trail_profiles: Vec<TrailProfile>,
    radial_table: CurveTable,
    atomic_table: CurveTable,
    probe_table: CurveTable,
    noise: NoiseField,
}

impl SolverState {
    /// Build solver state for the given unit-sphere vertex positions.
    ///
    /// Vertices start at their rest positions (`original * radius`),
    /// colors at the base color, and all force channels at zero.
    pub fn new(positions: &[Vec3], config: &MembraneConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        if positions.is_empty() {
            return Err(ConfigError::EmptyMesh);
        }

        let original: Vec<Vec3> = positions.to_vec();
        let current: Vec<Vec3> = original.iter().map(|v| *v * config.radius).collect();
        let colors = vec![config.base_color; original.len()];

        let trail_profiles: Vec<TrailProfile> =
            config.trails.iter().map(|p| p.sanitized()).collect();
        let trails = vec![TrailNode::at(Vec3::ZERO); trail_profiles.len()];

        Ok(Self {
            forces: ForceChannels::new(original.len()),
            colors,
            current,
            original,
            trails,
            trail_profiles,
            radial_table: CurveTable::bake(&config.radial_curve, config.table_resolution)?,
            atomic_table: CurveTable::bake(&config.atomic_curve, config.table_resolution)?,
            probe_table: CurveTable::bake(&config.probe_curve, config.table_resolution)?,
            noise: NoiseField::new(config.noise_seed),
        })
    }

    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.current.len()
    }

    /// Whether the state is empty (never true for a validated state).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Deformed vertex positions, membrane-local space.
    #[inline]
    pub fn vertices(&self) -> &[Vec3] {
        &self.current
    }

    /// Per-vertex colors.
    #[inline]
    pub fn colors(&self) -> &[Vec4] {
        &self.colors
    }

    /// The smoothed force channels, for inspection and debug draws.
    #[inline]
    pub fn forces(&self) -> &ForceChannels {
        &self.forces
    }

    /// The trail chain nodes.
    #[inline]
    pub fn trail_nodes(&self) -> &[TrailNode] {
        &self.trails
    }

    /// Snap everything back to rest: vertices to `original * radius`,
    /// colors to the base color, forces to zero, trail nodes to `center`.
    pub fn reset(&mut self, radius: f32, base_color: Vec4, center: Vec3) {
        for (current, original) in self.current.iter_mut().zip(&self.original) {
            *current = *original * radius;
        }
        self.colors.fill(base_color);
        self.forces.reset();
        for node in &mut self.trails {
            *node = TrailNode::at(center);
        }
    }

    /// Capture trail-node local positions for the coming tick. Part of the
    /// snapshot phase; must run before [`step`](Self::step).
    pub fn snapshot_trails(&mut self, center: Vec3) {
        trail::snapshot_locals(&mut self.trails, center);
    }

    /// Advance one tick.
    ///
    /// Panics if the vertex buffers have drifted out of sync - that means
    /// the mesh topology changed without rebuilding the state, which is a
    /// caller protocol violation, not a recoverable condition.
    pub fn step(&mut self, snapshot: &TickSnapshot) {
        let n = self.current.len();
        assert!(
            n == self.original.len() && n == self.forces.len() && n == self.colors.len(),
            "Vertex buffer lengths diverged; topology changed without reinitializing"
        );

        let p = &snapshot.params;
        let has_trails = !self.trails.is_empty();

        if has_trails {
            trail::update_chain(
                &mut self.trails,
                &self.trail_profiles,
                p.center,
                p.adjusted_radius,
                p.time,
                p.dt,
                &self.noise,
            );
        }

        let fade = p.dt.clamp(0.0, 1.0);

        for i in 0..n {
            // With a trail chain the color washes back out gradually;
            // otherwise it is rebuilt from the base color every tick.
            if has_trails {
                self.colors[i] = self.colors[i].lerp(p.base_color, fade);
            } else {
                self.colors[i] = p.base_color;
            }

            let current = self.current[i];
            let rest = self.original[i] * p.adjusted_radius;

            self.radial_force(i, current, rest, p);
            self.atomic_force(i, current, p);
            self.probe_force(i, current, p, &snapshot.probes);
            if has_trails {
                self.trail_force(i, current, p);
            }

            let mut next = current + self.forces.composite(i);
            if has_trails {
                next += self.forces.trail[i];
            }
            if p.solidity >= 1.0 {
                next = rest;
            } else if p.solidity > 0.0 {
                next = next.lerp(rest, p.solidity);
            }
            self.current[i] = next;
        }
    }

    /// Restoring force toward the rest position, optionally turbulated.
    fn radial_force(&mut self, i: usize, current: Vec3, rest: Vec3, p: &StepParams) {
        let dv = rest - current;
        let nd = (dv.length_squared() / (p.adjusted_radius * p.adjusted_radius)).clamp(0.0, 1.0);
        let mut target = dv * (self.radial_table.sample(nd) * p.radial_multiplier);

        if p.vertex_noise {
            let t = p.time * p.turbulence_speed;
            target.x +=
                self.noise.sample2(current.x * p.turbulence_scale, t) * p.turbulence_multiplier;
            target.y +=
                self.noise.sample2(current.y * p.turbulence_scale, t) * p.turbulence_multiplier;
            target.z +=
                self.noise.sample2(current.z * p.turbulence_scale, t) * p.turbulence_multiplier;
        }

        self.forces.radial[i] = blend(self.forces.radial[i], target, p.radial_inertia, p.dt);
    }

    /// Pairwise repulsion/attraction against every other vertex. The
    /// dominant cost of a tick.
    fn atomic_force(&mut self, i: usize, current: Vec3, p: &StepParams) {
        let inv_r2 = 1.0 / (p.adjusted_radius * p.adjusted_radius);
        let mut target = Vec3::ZERO;

        for (j, &other) in self.current.iter().enumerate() {
            if j == i {
                continue;
            }
            let dv = current - other;
            let nd = (dv.length_squared() * inv_r2).clamp(0.0, 1.0);
            let strength = self.atomic_table.sample(nd) * p.atomic_multiplier;
            if strength <= 0.0 {
                continue;
            }
            target += dv * strength;
        }

        self.forces.atomic[i] = blend(self.forces.atomic[i], target, p.atomic_inertia, p.dt);
    }

    /// Shell force from each active probe, plus vertex color blending.
    fn probe_force(&mut self, i: usize, current: Vec3, p: &StepParams, probes: &[ProbeSnapshot]) {
        let mut target = Vec3::ZERO;

        for probe in probes {
            if !probe.active {
                continue;
            }

            let mut pos = probe.local_pos;
            let probe_radius = (p.min_probe_fraction * p.adjusted_radius).max(probe.radius);
            let nd = (current - pos).length_squared() / (probe_radius * probe_radius);
            if nd >= 1.0 {
                continue;
            }
            let nd = nd.max(0.0);

            // Push from the probe's innermost shell point, not its center;
            // this is what carves a dimple shape rather than a spike.
            pos -= pos.normalize_or_zero() * probe_radius;
            let mut dv = current - pos;

            // A probe straddling or outside the surface pulls inward
            // instead of pushing out.
            if probe.outside_shell {
                dv = -dv;
            }

            target += dv * (self.probe_table.sample(nd) * p.probe_multiplier);

            if p.vertex_colors && probe.use_color {
                let color = self.colors[i];
                let alpha = color.w.max(nd * nd);
                let mut color = color.lerp(probe.color, nd);
                color.w = alpha;
                self.colors[i] = color;
            }
        }

        self.forces.probe[i] = blend(self.forces.probe[i], target, p.probe_inertia, p.dt);
    }

    /// Shell force from each trail node. Same shape as the probe force but
    /// with the trail multiplier and no direction inversion.
    fn trail_force(&mut self, i: usize, current: Vec3, p: &StepParams) {
        let mut target = Vec3::ZERO;

        for node in &self.trails {
            let mut pos = node.local_pos;
            let radius = node.radius;
            if radius <= 0.0 {
                continue;
            }
            let nd = (current - pos).length_squared() / (radius * radius);
            if nd >= 1.0 {
                continue;
            }
            let nd = nd.max(0.0);

            pos -= pos.normalize_or_zero() * radius;
            let dv = current - pos;

            target += dv * (self.probe_table.sample(nd) * p.trail_multiplier);
        }

        self.forces.trail[i] = blend(self.forces.trail[i], target, p.trail_inertia, p.dt);
    }
}
