//! Simulation clock.
//!
//! The membrane never reads wall time; the host feeds frame deltas into a
//! [`SimClock`] and the simulation consumes the clock's view of elapsed
//! time and delta. This keeps stepping fully deterministic when the host
//! supplies a fixed delta, which the tests and benches rely on.
//!
//! # Example
//!
//! ```ignore
//! use membrane::time::SimClock;
//!
//! let mut clock = SimClock::new();
//! clock.set_fixed_delta(Some(1.0 / 60.0));
//!
//! // In the host's frame loop:
//! let (elapsed, dt) = clock.advance(frame_dt);
//! ```

/// Host-driven time tracking for a simulation instance.
#[derive(Clone, Debug)]
pub struct SimClock {
    /// Accumulated simulation time in seconds.
    elapsed_secs: f32,
    /// Effective delta of the last advance.
    delta_secs: f32,
    /// Ticks since creation or reset.
    frame_count: u64,
    /// Time scale multiplier (1.0 = normal speed).
    time_scale: f32,
    /// Fixed delta override for deterministic stepping.
    fixed_delta: Option<f32>,
    /// Whether time is paused.
    paused: bool,
}

impl SimClock {
    /// Create a clock at t = 0.
    pub fn new() -> Self {
        Self {
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            time_scale: 1.0,
            fixed_delta: None,
            paused: false,
        }
    }

    /// Advance by the host's frame delta. Call once per tick.
    ///
    /// Returns `(elapsed, delta)` after applying the fixed-delta override
    /// and time scale. While paused, delta is 0 and elapsed holds still.
    pub fn advance(&mut self, dt: f32) -> (f32, f32) {
        if self.paused {
            self.delta_secs = 0.0;
            return (self.elapsed_secs, 0.0);
        }

        let raw = self.fixed_delta.unwrap_or(dt).max(0.0);
        self.delta_secs = raw * self.time_scale;
        self.elapsed_secs += self.delta_secs;
        self.frame_count += 1;

        (self.elapsed_secs, self.delta_secs)
    }

    /// Accumulated simulation time in seconds.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Effective delta of the last advance.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Ticks since creation or reset.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Whether the clock is paused.
    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Current time scale multiplier.
    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Pause time progression. While paused, `advance` is a no-op.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume time progression.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Use a fixed delta regardless of what the host passes in.
    ///
    /// Pass `None` to go back to host timing.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }

    /// Set the time scale multiplier. Negative scales clamp to 0.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// Reset to t = 0, keeping scale and fixed-delta settings.
    pub fn reset(&mut self) {
        self.elapsed_secs = 0.0;
        self.delta_secs = 0.0;
        self.frame_count = 0;
        self.paused = false;
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clock() {
        let clock = SimClock::new();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.elapsed(), 0.0);
        assert!(!clock.is_paused());
        assert_eq!(clock.time_scale(), 1.0);
    }

    #[test]
    fn test_advance_accumulates() {
        let mut clock = SimClock::new();
        let (elapsed, dt) = clock.advance(0.25);
        assert_eq!(dt, 0.25);
        assert_eq!(elapsed, 0.25);

        clock.advance(0.25);
        assert_eq!(clock.elapsed(), 0.5);
        assert_eq!(clock.frame(), 2);
    }

    #[test]
    fn test_pause_freezes_time() {
        let mut clock = SimClock::new();
        clock.advance(0.1);
        clock.pause();

        let (elapsed, dt) = clock.advance(0.1);
        assert_eq!(dt, 0.0);
        assert!((elapsed - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_fixed_delta_overrides_host() {
        let mut clock = SimClock::new();
        clock.set_fixed_delta(Some(1.0 / 60.0));

        let (_, dt) = clock.advance(0.5);
        assert!((dt - 1.0 / 60.0).abs() < 1e-7);
    }

    #[test]
    fn test_time_scale() {
        let mut clock = SimClock::new();
        clock.set_time_scale(2.0);
        let (_, dt) = clock.advance(0.1);
        assert!((dt - 0.2).abs() < 1e-7);

        clock.set_time_scale(-1.0);
        assert_eq!(clock.time_scale(), 0.0);
    }

    #[test]
    fn test_negative_host_delta_clamped() {
        let mut clock = SimClock::new();
        let (_, dt) = clock.advance(-0.5);
        assert_eq!(dt, 0.0);
    }
}
