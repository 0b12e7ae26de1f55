//! The membrane surface and its two-phase tick pipeline.
//!
//! A [`Membrane`] owns a background worker and ping-pongs one
//! [`SolverState`] through it:
//!
//! - **Phase A** (the caller's thread, inside [`tick`](Membrane::tick)):
//!   receive the previous tick's finished state, publish its vertex and
//!   color buffers for the renderer, decay the radius pulse, snapshot the
//!   probes and trail chain, and hand the state back to the worker.
//! - **Phase B** (the worker): run the O(N²) force step into the state it
//!   now exclusively owns.
//!
//! Exactly one tick is ever in flight: the state is *moved* through the
//! channels, so the single-flight discipline is enforced by ownership, not
//! by convention. `tick` blocks until the in-flight step has finished,
//! which keeps phase-ordering guarantees trivially true and makes stepping
//! deterministic under a fixed delta.
//!
//! Dropping the membrane closes the job channel; a step already running is
//! allowed to finish and its result is discarded.
//!
//! # Example
//!
//! ```ignore
//! use membrane::prelude::*;
//!
//! let mesh = SphereMesh::icosphere(3);
//! let config = MembraneConfig::new(0.5);
//! let mut membrane = Membrane::new(&mesh, config)?;
//!
//! let finger = membrane.add_probe(Probe::new(Vec3::new(0.0, 0.0, 1.0), 0.02));
//!
//! // In the host's frame loop:
//! membrane.set_probe_position(finger, fingertip_world_pos);
//! for event in membrane.tick(frame_dt) {
//!     println!("{:?}", event);
//! }
//! upload(membrane.vertex_bytes(), membrane.color_bytes());
//! ```

use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};

use glam::{Vec3, Vec4};

use crate::config::{MembraneConfig, MIN_RADIUS};
use crate::error::ConfigError;
use crate::mesh::SphereMesh;
use crate::probe::{snapshot_probes, Probe, ProbeEvent};
use crate::solver::{SolverState, StepParams, TickSnapshot};
use crate::time::SimClock;

/// One simulation job: the owned state plus its tick snapshot. The same
/// pair shuttles back and forth so nothing is reallocated per tick.
type Job = (SolverState, TickSnapshot);

/// A deforming sphere surface driven by probes, trails, and turbulence.
pub struct Membrane {
    config: MembraneConfig,
    center: Vec3,
    probes: Vec<Probe>,
    events: Vec<ProbeEvent>,
    clock: SimClock,

    front_vertices: Vec<Vec3>,
    front_colors: Vec<Vec4>,

    /// Holds the job while no step is in flight (before the first tick).
    idle: Option<Job>,
    job_tx: Option<Sender<Job>>,
    result_rx: Receiver<Job>,
    worker: Option<JoinHandle<()>>,
}

impl Membrane {
    /// Create a membrane around the given mesh and start its worker.
    pub fn new(mesh: &SphereMesh, config: MembraneConfig) -> Result<Self, ConfigError> {
        let state = SolverState::new(mesh.positions(), &config)?;

        let front_vertices = state.vertices().to_vec();
        let front_colors = state.colors().to_vec();
        let snapshot = TickSnapshot::new(StepParams::from_config(&config, 0.0, 0.0, Vec3::ZERO));

        let (job_tx, job_rx) = channel::<Job>();
        let (result_tx, result_rx) = channel::<Job>();

        let worker = thread::Builder::new()
            .name("membrane-solver".into())
            .spawn(move || {
                while let Ok((mut state, snapshot)) = job_rx.recv() {
                    state.step(&snapshot);
                    if result_tx.send((state, snapshot)).is_err() {
                        break;
                    }
                }
            })
            .expect("failed to spawn membrane worker thread");

        Ok(Self {
            config,
            center: Vec3::ZERO,
            probes: Vec::new(),
            events: Vec::new(),
            clock: SimClock::new(),
            front_vertices,
            front_colors,
            idle: Some((state, snapshot)),
            job_tx: Some(job_tx),
            result_rx,
            worker: Some(worker),
        })
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// Blocks until the previous tick's worker step has finished, publishes
    /// its output, snapshots current inputs, and dispatches the next step.
    /// Returns the containment transitions observed this tick; the slice is
    /// valid until the next call.
    pub fn tick(&mut self, dt: f32) -> &[ProbeEvent] {
        let (mut state, mut snapshot) = match self.idle.take() {
            Some(job) => job,
            None => self
                .result_rx
                .recv()
                .expect("membrane worker thread died mid-step"),
        };

        // Publish last tick's finished buffers.
        self.front_vertices.copy_from_slice(state.vertices());
        self.front_colors.copy_from_slice(state.colors());

        // Snapshot inputs for the next step. The adjusted radius uses the
        // pulse value from before this tick's decay.
        let (time, dt) = self.clock.advance(dt);
        snapshot.params = StepParams::from_config(&self.config, dt, time, self.center);
        self.config.radius_multiplier +=
            (0.0 - self.config.radius_multiplier) * dt.clamp(0.0, 1.0);

        snapshot_probes(
            &mut self.probes,
            self.center,
            self.config.radius,
            &mut snapshot.probes,
            &mut self.events,
        );
        state.snapshot_trails(self.center);

        self.job_tx
            .as_ref()
            .expect("membrane already disposed")
            .send((state, snapshot))
            .expect("membrane worker thread died");

        &self.events
    }

    /// Snap the surface back to its rest shape, discarding accumulated
    /// deformation, forces, colors, and clock time. Blocks on any step
    /// still in flight so the reset cannot race it.
    pub fn reset(&mut self) {
        let (mut state, snapshot) = match self.idle.take() {
            Some(job) => job,
            None => self
                .result_rx
                .recv()
                .expect("membrane worker thread died mid-step"),
        };
        state.reset(self.config.radius, self.config.base_color, self.center);
        self.front_vertices.copy_from_slice(state.vertices());
        self.front_colors.copy_from_slice(state.colors());
        self.clock.reset();
        self.events.clear();
        self.idle = Some((state, snapshot));
    }

    // =========================================================================
    // OUTPUT BUFFERS
    // =========================================================================

    /// Deformed vertex positions as of the last published tick,
    /// membrane-local space.
    #[inline]
    pub fn vertices(&self) -> &[Vec3] {
        &self.front_vertices
    }

    /// Per-vertex colors as of the last published tick.
    #[inline]
    pub fn colors(&self) -> &[Vec4] {
        &self.front_colors
    }

    /// Vertex positions as raw bytes, ready for a vertex-buffer upload.
    #[inline]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.front_vertices)
    }

    /// Vertex colors as raw bytes (RGBA f32).
    #[inline]
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.front_colors)
    }

    /// Containment transitions observed by the most recent tick.
    #[inline]
    pub fn last_events(&self) -> &[ProbeEvent] {
        &self.events
    }

    // =========================================================================
    // PROBES
    // =========================================================================

    /// Add a probe; returns its index.
    pub fn add_probe(&mut self, probe: Probe) -> usize {
        self.probes.push(probe);
        self.probes.len() - 1
    }

    /// Remove all probes.
    pub fn clear_probes(&mut self) {
        self.probes.clear();
    }

    /// The current probe list.
    #[inline]
    pub fn probes(&self) -> &[Probe] {
        &self.probes
    }

    /// Move a probe. Takes effect on the next tick.
    pub fn set_probe_position(&mut self, index: usize, position: Vec3) {
        self.probes[index].position = position;
    }

    /// Enable or disable a probe's force contribution.
    pub fn set_probe_enabled(&mut self, index: usize, enabled: bool) {
        self.probes[index].enabled = enabled;
    }

    // =========================================================================
    // PARAMETERS
    // =========================================================================

    /// The live configuration.
    #[inline]
    pub fn config(&self) -> &MembraneConfig {
        &self.config
    }

    /// Membrane center in world space.
    #[inline]
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Move the membrane center. Probe containment and trail seeking are
    /// relative to this point.
    pub fn set_center(&mut self, center: Vec3) {
        self.center = center;
    }

    /// Set the rest radius, clamped to the minimum positive radius.
    pub fn set_radius(&mut self, radius: f32) {
        self.config.radius = if radius.is_finite() {
            radius.max(MIN_RADIUS)
        } else {
            MIN_RADIUS
        };
    }

    /// Kick the transient radius pulse. Decays back to zero on its own.
    pub fn set_radius_multiplier(&mut self, multiplier: f32) {
        self.config.radius_multiplier = multiplier;
    }

    /// Set solidity, clamped to [0, 1].
    pub fn set_solidity(&mut self, solidity: f32) {
        self.config.solidity = solidity.clamp(0.0, 1.0);
    }

    /// Set the turbulence amplitude.
    pub fn set_turbulence_multiplier(&mut self, multiplier: f32) {
        self.config.turbulence_multiplier = multiplier;
    }

    /// Set the turbulence time scale.
    pub fn set_turbulence_speed(&mut self, speed: f32) {
        self.config.turbulence_speed = speed;
    }

    /// The simulation clock, for fixed-delta or time-scale control.
    pub fn clock_mut(&mut self) -> &mut SimClock {
        &mut self.clock
    }
}

impl Drop for Membrane {
    fn drop(&mut self) {
        // Closing the job channel ends the worker loop; an in-flight step
        // finishes and its result is dropped with the result channel.
        self.job_tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
