//! Seeded coherent noise for force turbulence and trail jitter.
//!
//! A small simplex-noise sampler, owned by the simulation instance and
//! constructed from an explicit seed - never process-global state. The
//! per-vertex turbulence path calls this up to 3N times per tick, so the
//! implementation is a plain table-driven gradient evaluation with no
//! allocation.
//!
//! Output is canonically in **[-1, 1]** for both the 2D and 3D samplers.
//! Call sites that want [0, 1] must apply `0.5 * (n + 1.0)` themselves.
//!
//! # Example
//!
//! ```ignore
//! use membrane::NoiseField;
//!
//! let noise = NoiseField::new(42);
//! let n = noise.sample2(0.3, 1.7);
//! assert!((-1.0..=1.0).contains(&n));
//! ```

/// Skewing factors for 2D simplex noise.
const F2: f32 = 0.366_025_4; // (sqrt(3) - 1) / 2
const G2: f32 = 0.211_324_87; // (3 - sqrt(3)) / 6

/// Skewing factors for 3D simplex noise.
const F3: f32 = 1.0 / 3.0;
const G3: f32 = 1.0 / 6.0;

/// Gradient directions for 2D and 3D sampling.
const GRAD3: [[f32; 3]; 12] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
];

/// Deterministic simplex-noise sampler.
///
/// Two instances built with the same seed produce identical output for all
/// coordinates. Cheap to sample, immutable after construction, and safe to
/// share read-only across threads.
#[derive(Clone, Debug)]
pub struct NoiseField {
    perm: [u8; 512],
}

impl NoiseField {
    /// Build a noise field from a seed.
    pub fn new(seed: u64) -> Self {
        // Fisher-Yates shuffle of the identity permutation, driven by a
        // splitmix64 stream so every u64 seed yields a distinct table.
        let mut state = seed;
        let mut next = move || {
            state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
            let mut z = state;
            z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
            z ^ (z >> 31)
        };

        let mut table = [0u8; 256];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = i as u8;
        }
        for i in (1..256).rev() {
            let j = (next() % (i as u64 + 1)) as usize;
            table.swap(i, j);
        }

        let mut perm = [0u8; 512];
        for i in 0..512 {
            perm[i] = table[i & 255];
        }
        Self { perm }
    }

    #[inline]
    fn hash(&self, i: usize) -> usize {
        self.perm[i & 511] as usize
    }

    /// Sample 2D noise at (x, y). Returns a value in [-1, 1].
    pub fn sample2(&self, x: f32, y: f32) -> f32 {
        // Skew input space to determine the containing simplex cell.
        let s = (x + y) * F2;
        let i = (x + s).floor();
        let j = (y + s).floor();

        let t = (i + j) * G2;
        let x0 = x - (i - t);
        let y0 = y - (j - t);

        // Offsets for the middle corner: upper or lower triangle.
        let (i1, j1) = if x0 > y0 { (1.0, 0.0) } else { (0.0, 1.0) };

        let x1 = x0 - i1 + G2;
        let y1 = y0 - j1 + G2;
        let x2 = x0 - 1.0 + 2.0 * G2;
        let y2 = y0 - 1.0 + 2.0 * G2;

        let ii = i as i64 as usize;
        let jj = j as i64 as usize;

        let gi0 = self.hash(ii.wrapping_add(self.hash(jj))) % 12;
        let gi1 = self.hash(ii.wrapping_add(i1 as usize).wrapping_add(self.hash(jj.wrapping_add(j1 as usize)))) % 12;
        let gi2 = self.hash(ii.wrapping_add(1).wrapping_add(self.hash(jj.wrapping_add(1)))) % 12;

        let mut n = 0.0;
        for (gi, (cx, cy)) in [(gi0, (x0, y0)), (gi1, (x1, y1)), (gi2, (x2, y2))] {
            let mut t = 0.5 - cx * cx - cy * cy;
            if t > 0.0 {
                t *= t;
                let g = GRAD3[gi];
                n += t * t * (g[0] * cx + g[1] * cy);
            }
        }

        // Scale to cover [-1, 1]. The scale constant slightly overshoots
        // for extreme gradient alignments, so pin the contract with a clamp.
        (70.0 * n).clamp(-1.0, 1.0)
    }

    /// Sample 3D noise at (x, y, z). Returns a value in [-1, 1].
    pub fn sample3(&self, x: f32, y: f32, z: f32) -> f32 {
        let s = (x + y + z) * F3;
        let i = (x + s).floor();
        let j = (y + s).floor();
        let k = (z + s).floor();

        let t = (i + j + k) * G3;
        let x0 = x - (i - t);
        let y0 = y - (j - t);
        let z0 = z - (k - t);

        // Rank the coordinates to pick the simplex traversal order.
        let (i1, j1, k1, i2, j2, k2) = if x0 >= y0 {
            if y0 >= z0 {
                (1, 0, 0, 1, 1, 0)
            } else if x0 >= z0 {
                (1, 0, 0, 1, 0, 1)
            } else {
                (0, 0, 1, 1, 0, 1)
            }
        } else if y0 < z0 {
            (0, 0, 1, 0, 1, 1)
        } else if x0 < z0 {
            (0, 1, 0, 0, 1, 1)
        } else {
            (0, 1, 0, 1, 1, 0)
        };

        let x1 = x0 - i1 as f32 + G3;
        let y1 = y0 - j1 as f32 + G3;
        let z1 = z0 - k1 as f32 + G3;
        let x2 = x0 - i2 as f32 + 2.0 * G3;
        let y2 = y0 - j2 as f32 + 2.0 * G3;
        let z2 = z0 - k2 as f32 + 2.0 * G3;
        let x3 = x0 - 1.0 + 3.0 * G3;
        let y3 = y0 - 1.0 + 3.0 * G3;
        let z3 = z0 - 1.0 + 3.0 * G3;

        let ii = i as i64 as usize;
        let jj = j as i64 as usize;
        let kk = k as i64 as usize;

        let gi0 = self.hash(ii.wrapping_add(self.hash(jj.wrapping_add(self.hash(kk))))) % 12;
        let gi1 = self
            .hash(ii.wrapping_add(i1).wrapping_add(self.hash(jj.wrapping_add(j1).wrapping_add(self.hash(kk.wrapping_add(k1)))))) % 12;
        let gi2 = self
            .hash(ii.wrapping_add(i2).wrapping_add(self.hash(jj.wrapping_add(j2).wrapping_add(self.hash(kk.wrapping_add(k2)))))) % 12;
        let gi3 = self
            .hash(ii.wrapping_add(1).wrapping_add(self.hash(jj.wrapping_add(1).wrapping_add(self.hash(kk.wrapping_add(1)))))) % 12;

        let corners = [
            (gi0, x0, y0, z0),
            (gi1, x1, y1, z1),
            (gi2, x2, y2, z2),
            (gi3, x3, y3, z3),
        ];

        let mut n = 0.0;
        for (gi, cx, cy, cz) in corners {
            let mut t = 0.6 - cx * cx - cy * cy - cz * cz;
            if t > 0.0 {
                t *= t;
                let g = GRAD3[gi];
                n += t * t * (g[0] * cx + g[1] * cy + g[2] * cz);
            }
        }

        (32.0 * n).clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_output() {
        let a = NoiseField::new(7);
        let b = NoiseField::new(7);
        for i in 0..100 {
            let x = i as f32 * 0.17;
            let y = i as f32 * 0.31;
            assert_eq!(a.sample2(x, y), b.sample2(x, y));
            assert_eq!(a.sample3(x, y, x + y), b.sample3(x, y, x + y));
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = NoiseField::new(1);
        let b = NoiseField::new(2);
        let differs = (0..100).any(|i| {
            let x = i as f32 * 0.23;
            a.sample2(x, x * 0.5) != b.sample2(x, x * 0.5)
        });
        assert!(differs);
    }

    #[test]
    fn test_sample2_in_range() {
        let noise = NoiseField::new(99);
        for i in 0..1000 {
            let x = (i % 71) as f32 * 0.13 - 4.0;
            let y = (i / 71) as f32 * 0.29 - 2.0;
            let n = noise.sample2(x, y);
            assert!((-1.0..=1.0).contains(&n), "sample2({}, {}) = {}", x, y, n);
        }
    }

    #[test]
    fn test_sample3_in_range() {
        let noise = NoiseField::new(99);
        for i in 0..1000 {
            let x = (i % 31) as f32 * 0.21 - 3.0;
            let y = (i % 17) as f32 * 0.37 - 3.0;
            let z = (i % 11) as f32 * 0.53 - 3.0;
            let n = noise.sample3(x, y, z);
            assert!((-1.0..=1.0).contains(&n), "sample3 out of range: {}", n);
        }
    }

    #[test]
    fn test_noise_is_not_constant() {
        let noise = NoiseField::new(3);
        let a = noise.sample2(0.1, 0.2);
        let b = noise.sample2(5.3, 2.9);
        assert_ne!(a, b);
    }
}
