//! Seed geometry for icosphere generation: a regular icosahedron centered at the origin.

use glam::Vec3;

/// The golden ratio `(1 + √5) / 2`.
const PHI: f32 = 1.618_034;

/// The 12 icosahedron vertices (not normalized).
///
/// Each vertex is a cyclic permutation of `(±1, ±φ, 0)`.
pub const ICOSAHEDRON_VERTICES: [Vec3; 12] = [
    Vec3::new(-1.0, PHI, 0.0),
    Vec3::new(1.0, PHI, 0.0),
    Vec3::new(-1.0, -PHI, 0.0),
    Vec3::new(1.0, -PHI, 0.0),
    Vec3::new(0.0, -1.0, PHI),
    Vec3::new(0.0, 1.0, PHI),
    Vec3::new(0.0, -1.0, -PHI),
    Vec3::new(0.0, 1.0, -PHI),
    Vec3::new(PHI, 0.0, -1.0),
    Vec3::new(PHI, 0.0, 1.0),
    Vec3::new(-PHI, 0.0, -1.0),
    Vec3::new(-PHI, 0.0, 1.0),
];

/// The 20 icosahedron faces, counter-clockwise when viewed from outside.
#[rustfmt::skip]
pub const ICOSAHEDRON_INDICES: [u32; 60] = [
    // 5 faces around vertex 0
    0, 11, 5,
    0, 5, 1,
    0, 1, 7,
    0, 7, 10,
    0, 10, 11,
    // 5 adjacent faces
    1, 5, 9,
    5, 11, 4,
    11, 10, 2,
    10, 7, 6,
    7, 1, 8,
    // 5 faces around vertex 3
    3, 9, 4,
    3, 4, 2,
    3, 2, 6,
    3, 6, 8,
    3, 8, 9,
    // 5 adjacent faces
    4, 9, 5,
    2, 4, 11,
    6, 2, 10,
    8, 6, 7,
    9, 8, 1,
];

/// Number of faces on the base icosahedron.
pub const ICOSAHEDRON_FACE_COUNT: usize = ICOSAHEDRON_INDICES.len() / 3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vertices_equidistant() {
        let expected = ICOSAHEDRON_VERTICES[0].length();
        for v in ICOSAHEDRON_VERTICES {
            assert!((v.length() - expected).abs() < 1e-5);
        }
    }

    #[test]
    fn test_every_vertex_has_five_faces() {
        let mut valence = [0u32; 12];
        for &i in &ICOSAHEDRON_INDICES {
            valence[i as usize] += 1;
        }
        assert!(valence.iter().all(|&n| n == 5), "valence = {valence:?}");
    }

    #[test]
    fn test_faces_wind_outward() {
        for tri in ICOSAHEDRON_INDICES.chunks_exact(3) {
            let a = ICOSAHEDRON_VERTICES[tri[0] as usize];
            let b = ICOSAHEDRON_VERTICES[tri[1] as usize];
            let c = ICOSAHEDRON_VERTICES[tri[2] as usize];
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0, "face {tri:?} winds inward");
        }
    }
}
