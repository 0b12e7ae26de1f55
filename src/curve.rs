//! Response curves and baked lookup tables.
//!
//! Force strength as a function of normalized distance is authored as a
//! [`ResponseCurve`] (a small cubic-Hermite keyframe spline) and then baked
//! into a [`CurveTable`] once, at construction time. The per-tick loops only
//! ever touch the table: a clamp, a multiply, and an index. No interpolation
//! is done on lookup - the table is deliberately coarse in exchange for a
//! branch-free O(1) sample in the O(N²) inner loop.
//!
//! # Example
//!
//! ```ignore
//! use membrane::{CurveTable, ResponseCurve};
//!
//! let curve = ResponseCurve::falloff(0.5);
//! let table = CurveTable::bake(&curve, 1024)?;
//!
//! let strength = table.sample(0.25);
//! ```

use crate::error::ConfigError;

/// A single key on a [`ResponseCurve`].
///
/// Tangents are expressed as value-per-unit-t slopes, matching the usual
/// spline-editor convention.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyframe {
    /// Position of the key on the t axis. Curves are sampled over [0, 1].
    pub t: f32,
    /// Curve value at this key.
    pub value: f32,
    /// Incoming slope.
    pub in_tangent: f32,
    /// Outgoing slope.
    pub out_tangent: f32,
}

impl Keyframe {
    /// Create a key with flat (zero) tangents.
    pub fn new(t: f32, value: f32) -> Self {
        Self {
            t,
            value,
            in_tangent: 0.0,
            out_tangent: 0.0,
        }
    }

    /// Create a key with explicit tangents.
    pub fn with_tangents(t: f32, value: f32, in_tangent: f32, out_tangent: f32) -> Self {
        Self {
            t,
            value,
            in_tangent,
            out_tangent,
        }
    }
}

/// A user-authored force response curve.
///
/// Evaluated with cubic Hermite interpolation between keyframes; constant
/// beyond the first and last key. These are configuration-time objects -
/// the simulation itself reads the baked [`CurveTable`].
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseCurve {
    keys: Vec<Keyframe>,
}

impl ResponseCurve {
    /// Create a curve from a list of keyframes.
    ///
    /// Keys are sorted by `t`. At least one key is required.
    pub fn new(mut keys: Vec<Keyframe>) -> Result<Self, ConfigError> {
        if keys.is_empty() {
            return Err(ConfigError::EmptyCurve);
        }
        keys.sort_by(|a, b| a.t.total_cmp(&b.t));
        Ok(Self { keys })
    }

    /// A curve that evaluates to `value` everywhere.
    pub fn constant(value: f32) -> Self {
        Self {
            keys: vec![Keyframe::new(0.0, value)],
        }
    }

    /// A straight line from `from` at t=0 to `to` at t=1.
    pub fn linear(from: f32, to: f32) -> Self {
        let slope = to - from;
        Self {
            keys: vec![
                Keyframe::with_tangents(0.0, from, slope, slope),
                Keyframe::with_tangents(1.0, to, slope, slope),
            ],
        }
    }

    /// A smoothstep-shaped ramp from `from` at t=0 to `to` at t=1.
    pub fn smooth(from: f32, to: f32) -> Self {
        Self {
            keys: vec![Keyframe::new(0.0, from), Keyframe::new(1.0, to)],
        }
    }

    /// Full strength at t=0, smoothly falling to zero at `cutoff` and
    /// staying there. `cutoff` is clamped to (0, 1].
    pub fn falloff(cutoff: f32) -> Self {
        let cutoff = cutoff.clamp(1e-3, 1.0);
        let mut keys = vec![Keyframe::new(0.0, 1.0), Keyframe::new(cutoff, 0.0)];
        if cutoff < 1.0 {
            keys.push(Keyframe::new(1.0, 0.0));
        }
        Self { keys }
    }

    /// The keyframes, sorted by `t`.
    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    /// Evaluate the curve at `t`.
    ///
    /// Constant extrapolation outside the key range.
    pub fn evaluate(&self, t: f32) -> f32 {
        let first = self.keys[0];
        let last = self.keys[self.keys.len() - 1];
        if t <= first.t {
            return first.value;
        }
        if t >= last.t {
            return last.value;
        }

        // Find the segment containing t. Key counts are tiny, a linear scan
        // beats a binary search here.
        let mut k1 = 1;
        while self.keys[k1].t < t {
            k1 += 1;
        }
        let a = self.keys[k1 - 1];
        let b = self.keys[k1];

        let h = b.t - a.t;
        if h <= f32::EPSILON {
            return b.value;
        }

        let s = (t - a.t) / h;
        let s2 = s * s;
        let s3 = s2 * s;

        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;

        h00 * a.value + h10 * h * a.out_tangent + h01 * b.value + h11 * h * b.in_tangent
    }
}

/// A fixed-resolution lookup table baked from a [`ResponseCurve`].
///
/// `sample` clamps its argument to [0, 1] and truncates to a bucket index,
/// so out-of-range inputs behave exactly like their clamped equivalents.
/// Immutable after baking and safe to share read-only across threads.
#[derive(Clone, Debug)]
pub struct CurveTable {
    samples: Vec<f32>,
}

impl CurveTable {
    /// Bake `curve` into a table of `resolution` buckets.
    ///
    /// Bucket `i` holds `curve.evaluate(i / resolution)`. Rebake whenever
    /// the curve or the resolution changes; both are rare,
    /// configuration-time events.
    pub fn bake(curve: &ResponseCurve, resolution: usize) -> Result<Self, ConfigError> {
        if resolution == 0 {
            return Err(ConfigError::ZeroTableResolution);
        }
        let samples = (0..resolution)
            .map(|i| curve.evaluate(i as f32 / resolution as f32))
            .collect();
        Ok(Self { samples })
    }

    /// Number of buckets in the table.
    #[inline]
    pub fn resolution(&self) -> usize {
        self.samples.len()
    }

    /// Look up the curve value for a normalized distance.
    ///
    /// `normalized` is clamped to [0, 1] before indexing.
    #[inline]
    pub fn sample(&self, normalized: f32) -> f32 {
        let t = normalized.clamp(0.0, 1.0);
        let index = (t * (self.samples.len() - 1) as f32) as usize;
        self.samples[index]
    }
}
