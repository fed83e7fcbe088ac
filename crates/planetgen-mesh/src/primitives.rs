//! Small indexed primitives: an XY quad and an axis-aligned box.
//!
//! Used as debug geometry and as well-conditioned fixtures for tangent-space
//! generation.

use glam::{Vec2, Vec3};

use crate::mesh::Mesh;
use crate::winding::reverse_faces;

/// An axis-aligned quad in the `z = 0` plane spanning `lower_left..upper_right`.
///
/// UVs run from `(0, 0)` at the lower-left corner to `(1, 1)` at the upper-right.
/// All normals point down `-Z`.
pub fn quad(lower_left: Vec2, upper_right: Vec2) -> Mesh {
    let mut mesh = Mesh::new();
    let corners = [
        (Vec3::new(lower_left.x, lower_left.y, 0.0), Vec2::new(0.0, 0.0)),
        (Vec3::new(upper_right.x, lower_left.y, 0.0), Vec2::new(1.0, 0.0)),
        (Vec3::new(lower_left.x, upper_right.y, 0.0), Vec2::new(0.0, 1.0)),
        (Vec3::new(upper_right.x, upper_right.y, 0.0), Vec2::new(1.0, 1.0)),
    ];
    for (position, uv) in corners {
        mesh.push_vertex(position, uv, Vec3::NEG_Z);
    }
    mesh.indices = vec![0, 1, 2, 2, 1, 3];
    mesh
}

/// One face of the unit box: outward normal plus the in-plane `u` and `v` axes.
///
/// `u × v == normal`, so corners walked in `(0,0) (1,0) (1,1) (0,1)` order are
/// counter-clockwise seen from outside.
const BOX_FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::NEG_Z, Vec3::Y),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::X, Vec3::NEG_Z),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
];

/// An axis-aligned box with one corner at the origin and the opposite corner at `dimensions`.
///
/// Each face has its own four vertices so normals and UVs stay per-face
/// (24 vertices, 36 indices). With `front_facing` false the triangles wind
/// inward, for a box seen from the inside; normals still point out.
pub fn cube(dimensions: Vec3, front_facing: bool) -> Mesh {
    let mut mesh = Mesh::new();
    let center = Vec3::splat(0.5);

    for (normal, u, v) in BOX_FACES {
        let base = mesh.vertex_count() as u32;
        for uv in [Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y] {
            let unit = center + normal * 0.5 + u * (uv.x - 0.5) + v * (uv.y - 0.5);
            mesh.push_vertex(unit * dimensions, uv, normal);
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    if !front_facing {
        reverse_faces(&mut mesh);
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangle_winds_outward;

    #[test]
    fn test_quad_layout() {
        let mesh = quad(Vec2::new(-1.0, -2.0), Vec2::new(3.0, 4.0));
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 2, 1, 3]);
        assert_eq!(mesh.positions[3], Vec3::new(3.0, 4.0, 0.0));
        assert_eq!(mesh.uvs[1], Vec2::new(1.0, 0.0));
        assert!(mesh.normals.iter().all(|n| *n == Vec3::NEG_Z));
    }

    #[test]
    fn test_box_axes_are_right_handed() {
        for (normal, u, v) in BOX_FACES {
            assert_eq!(u.cross(v), normal);
        }
    }

    #[test]
    fn test_cube_counts() {
        let mesh = cube(Vec3::ONE, true);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert_eq!(mesh.validate(), Ok(()));
    }

    #[test]
    fn test_cube_spans_dimensions() {
        let dims = Vec3::new(2.0, 3.0, 4.0);
        let mesh = cube(dims, true);
        let min = mesh.positions.iter().fold(Vec3::splat(f32::MAX), |a, p| a.min(*p));
        let max = mesh.positions.iter().fold(Vec3::splat(f32::MIN), |a, p| a.max(*p));
        assert!((min - Vec3::ZERO).length() < 1e-6);
        assert!((max - dims).length() < 1e-6);
    }

    #[test]
    fn test_cube_faces_wind_outward() {
        let mesh = cube(Vec3::ONE, true);
        let center = Vec3::splat(0.5);
        for [a, b, c] in mesh.triangles() {
            let pa = mesh.positions[a as usize] - center;
            let pb = mesh.positions[b as usize] - center;
            let pc = mesh.positions[c as usize] - center;
            assert!(triangle_winds_outward(pa, pb, pc));
        }
    }

    #[test]
    fn test_back_facing_cube_winds_inward() {
        let front = cube(Vec3::ONE, true);
        let back = cube(Vec3::ONE, false);
        assert_eq!(back.positions, front.positions);
        assert_eq!(back.normals, front.normals);

        let center = Vec3::splat(0.5);
        for [a, b, c] in back.triangles() {
            let [pa, pb, pc] = [a, b, c].map(|i| back.positions[i as usize] - center);
            assert!(!triangle_winds_outward(pa, pb, pc));
        }
    }
}
