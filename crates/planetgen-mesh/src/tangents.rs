//! Per-vertex tangent space from triangle UV gradients.
//!
//! Each triangle contributes a tangent and bitangent derived from its edge
//! vectors and UV deltas. Contributions are summed into the triangle's three
//! vertices and normalized at the end, so shared vertices get a basis blended
//! from all adjacent faces.

use glam::{Vec2, Vec3};

use crate::mesh::Mesh;

/// UV determinants at or below this magnitude use a scale of `1.0` instead of `1 / det`.
pub const DEGENERATE_UV_EPSILON: f32 = 1e-4;

/// Tangent and bitangent of a single triangle, both normalized.
///
/// Returns zero vectors when the UV gradient vanishes entirely.
pub fn triangle_tangents(positions: [Vec3; 3], uvs: [Vec2; 3]) -> (Vec3, Vec3) {
    let basis = triangle_basis(positions, uvs);
    (basis.tangent, basis.bitangent)
}

struct TriangleBasis {
    tangent: Vec3,
    bitangent: Vec3,
    /// The UV determinant fell at or below [`DEGENERATE_UV_EPSILON`].
    degenerate: bool,
}

fn triangle_basis(positions: [Vec3; 3], uvs: [Vec2; 3]) -> TriangleBasis {
    let p = positions[1] - positions[0];
    let q = positions[2] - positions[0];

    let (s1, t1) = (uvs[1] - uvs[0]).into();
    let (s2, t2) = (uvs[2] - uvs[0]).into();

    let det = s1 * t2 - s2 * t1;
    let degenerate = det.abs() <= DEGENERATE_UV_EPSILON;
    let r = if degenerate { 1.0 } else { 1.0 / det };

    TriangleBasis {
        tangent: ((p * t2 - q * t1) * r).normalize_or_zero(),
        bitangent: ((q * s1 - p * s2) * r).normalize_or_zero(),
        degenerate,
    }
}

/// Populate `mesh.tangents` and `mesh.bitangents` from positions, UVs and indices.
///
/// Any previous tangent data is discarded. Vertices that no triangle
/// references keep a zero tangent and bitangent.
pub fn calculate_tangents(mesh: &mut Mesh) {
    debug_assert_eq!(
        mesh.uvs.len(),
        mesh.positions.len(),
        "tangent generation requires one uv per vertex"
    );

    let vertex_count = mesh.positions.len();
    let mut tangents = vec![Vec3::ZERO; vertex_count];
    let mut bitangents = vec![Vec3::ZERO; vertex_count];
    let mut degenerate = 0usize;

    for tri in mesh.indices.chunks_exact(3) {
        let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let basis = triangle_basis(
            [mesh.positions[i0], mesh.positions[i1], mesh.positions[i2]],
            [mesh.uvs[i0], mesh.uvs[i1], mesh.uvs[i2]],
        );
        degenerate += usize::from(basis.degenerate);

        for i in [i0, i1, i2] {
            tangents[i] += basis.tangent;
            bitangents[i] += basis.bitangent;
        }
    }

    for t in tangents.iter_mut().chain(bitangents.iter_mut()) {
        *t = t.normalize_or_zero();
    }

    if degenerate > 0 {
        tracing::trace!(degenerate, "triangles with degenerate uv mapping");
    }

    mesh.tangents = tangents;
    mesh.bitangents = bitangents;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cube, generate_sphere, quad};

    const EPS: f32 = 1e-4;

    #[test]
    fn test_quad_basis_is_orthonormal() {
        let mut mesh = quad(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0));
        calculate_tangents(&mut mesh);

        assert_eq!(mesh.tangents.len(), mesh.vertex_count());
        assert_eq!(mesh.bitangents.len(), mesh.vertex_count());

        for i in 0..mesh.vertex_count() {
            let (t, b, n) = (mesh.tangents[i], mesh.bitangents[i], mesh.normals[i]);
            assert!((t.length() - 1.0).abs() < EPS, "tangent {i} not unit: {t}");
            assert!((b.length() - 1.0).abs() < EPS, "bitangent {i} not unit: {b}");
            assert!(t.dot(b).abs() < EPS, "t·b = {}", t.dot(b));
            assert!(t.dot(n).abs() < EPS, "t·n = {}", t.dot(n));
            assert!(b.dot(n).abs() < EPS, "b·n = {}", b.dot(n));
        }
    }

    #[test]
    fn test_quad_tangent_follows_u_axis() {
        let mut mesh = quad(Vec2::new(0.0, 0.0), Vec2::new(4.0, 2.0));
        calculate_tangents(&mut mesh);
        for (t, b) in mesh.tangents.iter().zip(&mesh.bitangents) {
            assert!((*t - Vec3::X).length() < EPS);
            assert!((*b - Vec3::Y).length() < EPS);
        }
    }

    #[test]
    fn test_degenerate_uvs_do_not_produce_nan() {
        let mut mesh = quad(Vec2::ZERO, Vec2::ONE);
        mesh.uvs = vec![Vec2::splat(0.5); 4];
        calculate_tangents(&mut mesh);
        for (t, b) in mesh.tangents.iter().zip(&mesh.bitangents) {
            assert!(t.is_finite() && b.is_finite());
        }
    }

    #[test]
    fn test_near_degenerate_uvs_use_unit_scale() {
        // det = 1e-5: below the threshold, so the raw gradient is only normalized.
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Y];
        let uvs = [Vec2::ZERO, Vec2::new(0.01, 0.0), Vec2::new(0.0, 0.001)];
        let (t, b) = triangle_tangents(positions, uvs);
        assert!((t - Vec3::X).length() < EPS);
        assert!((b - Vec3::Y).length() < EPS);
    }

    #[test]
    fn test_basis_flags_degenerate_uvs() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Y];
        let regular = triangle_basis(positions, [Vec2::ZERO, Vec2::X, Vec2::Y]);
        assert!(!regular.degenerate);

        let collapsed_uvs = [Vec2::ZERO, Vec2::new(0.01, 0.0), Vec2::new(0.0, 0.001)];
        let collapsed = triangle_basis(positions, collapsed_uvs);
        assert!(collapsed.degenerate);
        let (t, b) = triangle_tangents(positions, collapsed_uvs);
        assert_eq!((collapsed.tangent, collapsed.bitangent), (t, b));
    }

    #[test]
    fn test_mirrored_uvs_flip_bitangent() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Y];
        let uvs = [Vec2::ZERO, Vec2::X, Vec2::NEG_Y];
        let (t, b) = triangle_tangents(positions, uvs);
        assert!((t - Vec3::X).length() < EPS);
        assert!((b - Vec3::NEG_Y).length() < EPS);
    }

    #[test]
    fn test_unreferenced_vertex_stays_zero() {
        let mut mesh = quad(Vec2::ZERO, Vec2::ONE);
        mesh.positions.push(Vec3::ONE);
        mesh.uvs.push(Vec2::ONE);
        mesh.normals.push(Vec3::Z);
        calculate_tangents(&mut mesh);
        assert_eq!(mesh.tangents[4], Vec3::ZERO);
        assert_eq!(mesh.bitangents[4], Vec3::ZERO);
    }

    #[test]
    fn test_cube_tangents_perpendicular_to_face_normals() {
        let mut mesh = cube(Vec3::new(2.0, 1.0, 3.0), true);
        calculate_tangents(&mut mesh);
        for i in 0..mesh.vertex_count() {
            assert!(mesh.tangents[i].dot(mesh.normals[i]).abs() < EPS);
            assert!((mesh.tangents[i].length() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_sphere_tangents_are_finite() {
        let mut mesh = generate_sphere(10.0, 2);
        calculate_tangents(&mut mesh);
        assert!(mesh.has_tangents());
        assert!(mesh.tangents.iter().all(|t| t.is_finite()));
        assert!(mesh.bitangents.iter().all(|b| b.is_finite()));
    }

    #[test]
    fn test_recalculation_replaces_previous_data() {
        let mut mesh = quad(Vec2::ZERO, Vec2::ONE);
        mesh.tangents = vec![Vec3::Z; 2];
        calculate_tangents(&mut mesh);
        assert_eq!(mesh.tangents.len(), 4);
    }
}
