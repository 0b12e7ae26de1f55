//! Unit icosphere generation.
//!
//! The simulation deforms a fixed vertex set; this module is the
//! mesh-generation collaborator that produces it. Topology is supplied
//! once at construction and never changes afterward - switching
//! subdivision level means building a new mesh and a new simulation
//! instance around it.
//!
//! Subdivision starts from a regular icosahedron and splits every triangle
//! into four, deduplicating edge midpoints, so level n has `20 * 4^n`
//! faces. All positions lie on the unit sphere; the simulation scales them
//! by the configured radius.

use std::collections::HashMap;

use glam::Vec3;

/// Maximum supported subdivision level. Level 6 is 81,920 triangles -
/// already far past what the O(N²) pairwise pass can keep up with.
pub const MAX_SUBDIVISIONS: u32 = 6;

/// An immutable triangle mesh on the unit sphere.
#[derive(Clone, Debug)]
pub struct SphereMesh {
    positions: Vec<Vec3>,
    indices: Vec<[u32; 3]>,
}

impl SphereMesh {
    /// Build a unit icosphere with the given subdivision level.
    ///
    /// Level 0 is the bare icosahedron (12 vertices); each level
    /// quadruples the face count.
    pub fn icosphere(subdivisions: u32) -> Self {
        assert!(
            subdivisions <= MAX_SUBDIVISIONS,
            "Subdivision level must be at most {}",
            MAX_SUBDIVISIONS
        );

        let t = (1.0 + 5.0_f32.sqrt()) / 2.0;

        let mut positions: Vec<Vec3> = [
            Vec3::new(-1.0, t, 0.0),
            Vec3::new(1.0, t, 0.0),
            Vec3::new(-1.0, -t, 0.0),
            Vec3::new(1.0, -t, 0.0),
            Vec3::new(0.0, -1.0, t),
            Vec3::new(0.0, 1.0, t),
            Vec3::new(0.0, -1.0, -t),
            Vec3::new(0.0, 1.0, -t),
            Vec3::new(t, 0.0, -1.0),
            Vec3::new(t, 0.0, 1.0),
            Vec3::new(-t, 0.0, -1.0),
            Vec3::new(-t, 0.0, 1.0),
        ]
        .iter()
        .map(|v| v.normalize())
        .collect();

        let mut indices: Vec<[u32; 3]> = vec![
            [0, 11, 5],
            [0, 5, 1],
            [0, 1, 7],
            [0, 7, 10],
            [0, 10, 11],
            [1, 5, 9],
            [5, 11, 4],
            [11, 10, 2],
            [10, 7, 6],
            [7, 1, 8],
            [3, 9, 4],
            [3, 4, 2],
            [3, 2, 6],
            [3, 6, 8],
            [3, 8, 9],
            [4, 9, 5],
            [2, 4, 11],
            [6, 2, 10],
            [8, 6, 7],
            [9, 8, 1],
        ];

        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();

        for _ in 0..subdivisions {
            let mut next = Vec::with_capacity(indices.len() * 4);
            for [a, b, c] in indices {
                let ab = midpoint(&mut positions, &mut midpoints, a, b);
                let bc = midpoint(&mut positions, &mut midpoints, b, c);
                let ca = midpoint(&mut positions, &mut midpoints, c, a);

                next.push([a, ab, ca]);
                next.push([b, bc, ab]);
                next.push([c, ca, bc]);
                next.push([ab, bc, ca]);
            }
            indices = next;
            midpoints.clear();
        }

        Self { positions, indices }
    }

    /// Vertex positions on the unit sphere.
    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Triangle index list.
    #[inline]
    pub fn indices(&self) -> &[[u32; 3]] {
        &self.indices
    }

    /// Number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }
}

/// Index of the deduplicated midpoint of edge (a, b), reprojected onto the
/// unit sphere.
fn midpoint(
    positions: &mut Vec<Vec3>,
    cache: &mut HashMap<(u32, u32), u32>,
    a: u32,
    b: u32,
) -> u32 {
    let key = if a < b { (a, b) } else { (b, a) };
    if let Some(&index) = cache.get(&key) {
        return index;
    }
    let mid = ((positions[a as usize] + positions[b as usize]) * 0.5).normalize();
    let index = positions.len() as u32;
    positions.push(mid);
    cache.insert(key, index);
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_zero_is_icosahedron() {
        let mesh = SphereMesh::icosphere(0);
        assert_eq!(mesh.vertex_count(), 12);
        assert_eq!(mesh.triangle_count(), 20);
    }

    #[test]
    fn test_subdivision_counts() {
        // V = 10 * 4^n + 2, F = 20 * 4^n for a subdivided icosahedron.
        for level in 0..4 {
            let mesh = SphereMesh::icosphere(level);
            let pow = 4usize.pow(level);
            assert_eq!(mesh.vertex_count(), 10 * pow + 2, "level {}", level);
            assert_eq!(mesh.triangle_count(), 20 * pow, "level {}", level);
        }
    }

    #[test]
    fn test_all_vertices_on_unit_sphere() {
        let mesh = SphereMesh::icosphere(3);
        for (i, v) in mesh.positions().iter().enumerate() {
            assert!(
                (v.length() - 1.0).abs() < 1e-5,
                "vertex {} has length {}",
                i,
                v.length()
            );
        }
    }

    #[test]
    fn test_indices_in_bounds() {
        let mesh = SphereMesh::icosphere(2);
        let n = mesh.vertex_count() as u32;
        for tri in mesh.indices() {
            for &i in tri {
                assert!(i < n);
            }
        }
    }

    #[test]
    #[should_panic]
    fn test_subdivision_cap() {
        SphereMesh::icosphere(MAX_SUBDIVISIONS + 1);
    }
}
