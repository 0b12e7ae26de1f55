//! Moving point influences ("probes") and containment tracking.
//!
//! A probe is an externally driven point - typically a tracked fingertip -
//! that locally attracts or repels the membrane surface. The host owns the
//! probe list and moves probes between ticks; the simulation only ever
//! reads an immutable per-tick snapshot of them.
//!
//! Containment is a two-state machine per probe (inside / outside the
//! membrane) with edge-triggered transitions. Transitions are delivered as
//! [`ProbeEvent`]s in a list drained once per tick, never as callbacks, so
//! nothing can re-enter the simulation mid-step.

use glam::{Vec3, Vec4};

/// A moving point influence on the membrane surface.
#[derive(Clone, Copy, Debug)]
pub struct Probe {
    /// World-space position, written by the host between ticks.
    pub position: Vec3,
    /// Disabled probes exert no force and fire no events.
    pub enabled: bool,
    /// Influence radius in world units. The effective radius is never
    /// smaller than the membrane's minimum probe fraction.
    pub radius: f32,
    /// Color blended into nearby vertices when vertex colors are on.
    pub color: Vec4,
    /// Whether this probe participates in color blending.
    pub use_color: bool,
    /// Containment state from the previous tick, for edge triggering.
    pub(crate) inside: bool,
}

impl Probe {
    /// Create an enabled probe with no color contribution.
    pub fn new(position: Vec3, radius: f32) -> Self {
        Self {
            position,
            enabled: true,
            radius,
            color: Vec4::ONE,
            use_color: false,
            inside: false,
        }
    }

    /// Enable color blending with the given color.
    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = color;
        self.use_color = true;
        self
    }

    /// Whether the probe was inside the membrane as of the last snapshot.
    #[inline]
    pub fn is_inside(&self) -> bool {
        self.inside
    }
}

/// A containment transition observed during a tick's snapshot phase.
///
/// Fired once per transition, carrying the index of the probe in the
/// membrane's probe list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProbeEvent {
    /// The probe moved fully inside the membrane this tick.
    Entered(usize),
    /// The probe left the membrane this tick.
    Exited(usize),
}

/// Immutable per-tick view of one probe, captured on the owning thread.
///
/// Everything the force pass needs is precomputed here so the worker never
/// touches host-owned probe state.
#[derive(Clone, Copy, Debug)]
pub struct ProbeSnapshot {
    /// Position in membrane-local space.
    pub local_pos: Vec3,
    /// World-space distance from the membrane center.
    pub dist_to_center: f32,
    /// Whether the probe exerts force this tick.
    pub active: bool,
    /// Influence radius.
    pub radius: f32,
    /// Probe color for vertex blending.
    pub color: Vec4,
    /// Whether color blending applies.
    pub use_color: bool,
    /// True when the probe sits outside the membrane shell, which inverts
    /// the push direction (carve a dimple instead of raising a bump).
    pub outside_shell: bool,
}

/// Snapshot every probe and record containment transitions.
///
/// `out` and `events` are reused buffers; both are cleared here. A probe is
/// inside when its center is deeper than its own radius below the surface:
/// `dist_to_center < radius - probe.radius`.
pub(crate) fn snapshot_probes(
    probes: &mut [Probe],
    center: Vec3,
    radius: f32,
    out: &mut Vec<ProbeSnapshot>,
    events: &mut Vec<ProbeEvent>,
) {
    out.clear();
    events.clear();

    for (index, probe) in probes.iter_mut().enumerate() {
        let local_pos = probe.position - center;
        let dist_to_center = local_pos.length();

        if dist_to_center < radius - probe.radius {
            if !probe.inside {
                events.push(ProbeEvent::Entered(index));
            }
            probe.inside = true;
        } else {
            if probe.inside {
                events.push(ProbeEvent::Exited(index));
            }
            probe.inside = false;
        }

        out.push(ProbeSnapshot {
            local_pos,
            dist_to_center,
            active: probe.enabled,
            radius: probe.radius,
            color: probe.color,
            use_color: probe.use_color,
            outside_shell: dist_to_center > radius - probe.radius,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_fires_once() {
        let mut probes = vec![Probe::new(Vec3::new(2.0, 0.0, 0.0), 0.1)];
        let mut out = Vec::new();
        let mut events = Vec::new();

        // Outside: no events.
        snapshot_probes(&mut probes, Vec3::ZERO, 1.0, &mut out, &mut events);
        assert!(events.is_empty());

        // Move to center: exactly one Entered.
        probes[0].position = Vec3::ZERO;
        snapshot_probes(&mut probes, Vec3::ZERO, 1.0, &mut out, &mut events);
        assert_eq!(events, vec![ProbeEvent::Entered(0)]);

        // Stay inside: silent.
        for _ in 0..10 {
            snapshot_probes(&mut probes, Vec3::ZERO, 1.0, &mut out, &mut events);
            assert!(events.is_empty());
        }
    }

    #[test]
    fn test_exit_fires_once() {
        let mut probes = vec![Probe::new(Vec3::ZERO, 0.1)];
        let mut out = Vec::new();
        let mut events = Vec::new();

        snapshot_probes(&mut probes, Vec3::ZERO, 1.0, &mut out, &mut events);
        assert_eq!(events, vec![ProbeEvent::Entered(0)]);

        probes[0].position = Vec3::new(3.0, 0.0, 0.0);
        snapshot_probes(&mut probes, Vec3::ZERO, 1.0, &mut out, &mut events);
        assert_eq!(events, vec![ProbeEvent::Exited(0)]);

        snapshot_probes(&mut probes, Vec3::ZERO, 1.0, &mut out, &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn test_containment_counts_probe_radius() {
        // Center 0.95 deep with probe radius 0.1: 0.95 > 1.0 - 0.1, so the
        // probe straddles the surface and is not contained.
        let mut probes = vec![Probe::new(Vec3::new(0.95, 0.0, 0.0), 0.1)];
        let mut out = Vec::new();
        let mut events = Vec::new();

        snapshot_probes(&mut probes, Vec3::ZERO, 1.0, &mut out, &mut events);
        assert!(events.is_empty());
        assert!(!probes[0].is_inside());
        assert!(out[0].outside_shell);
    }

    #[test]
    fn test_snapshot_local_space() {
        let mut probes = vec![Probe::new(Vec3::new(3.0, 1.0, 0.0), 0.1)];
        let mut out = Vec::new();
        let mut events = Vec::new();

        snapshot_probes(
            &mut probes,
            Vec3::new(2.0, 1.0, 0.0),
            1.0,
            &mut out,
            &mut events,
        );
        assert_eq!(out[0].local_pos, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(out[0].dist_to_center, 1.0);
    }

    #[test]
    fn test_disabled_probe_still_tracks_containment() {
        let mut probes = vec![Probe::new(Vec3::ZERO, 0.1)];
        probes[0].enabled = false;
        let mut out = Vec::new();
        let mut events = Vec::new();

        snapshot_probes(&mut probes, Vec3::ZERO, 1.0, &mut out, &mut events);
        assert!(!out[0].active);
        assert_eq!(events, vec![ProbeEvent::Entered(0)]);
    }
}
