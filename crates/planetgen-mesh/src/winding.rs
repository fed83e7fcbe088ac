//! Face winding reversal for shells viewed from the inside.
//!
//! With counter-clockwise front faces and backface culling enabled, an
//! atmosphere sphere enclosing the camera must have its triangles reversed to
//! stay visible.

use crate::mesh::Mesh;

/// Reverse the vertex order of every triangle in an index list.
///
/// Each triple `(i0, i1, i2)` becomes `(i2, i1, i0)`; triangle order is kept.
/// A trailing partial triangle is left untouched.
pub fn reverse_winding(indices: &mut [u32]) {
    for tri in indices.chunks_exact_mut(3) {
        tri.swap(0, 2);
    }
}

/// Reverse the winding of every face in `mesh`. Attribute arrays are untouched.
pub fn reverse_faces(mesh: &mut Mesh) {
    reverse_winding(&mut mesh.indices);
}

/// Return whether a triangle's geometric normal points away from the origin.
pub fn triangle_winds_outward(v0: glam::Vec3, v1: glam::Vec3, v2: glam::Vec3) -> bool {
    let face_normal = (v1 - v0).cross(v2 - v0);
    let centroid = (v0 + v1 + v2) / 3.0;
    face_normal.dot(centroid) > 0.0
}
