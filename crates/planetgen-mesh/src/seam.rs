//! Texture seam splitting for equirectangular spheres.
//!
//! [`equirectangular_uv`](crate::equirectangular_uv) wraps `u` from 1 back to 0
//! behind the sphere, so a triangle straddling that line interpolates across
//! almost the whole texture and its UV gradient points backwards. Splitting
//! gives such triangles their own copies of the low-`u` corners, shifted by
//! one full turn, which a repeating sampler maps to the same texels.
//! Pole vertices have no meaningful `u`; each triangle touching one gets a
//! private copy centered between its other two corners.

use glam::{Vec2, Vec3};
use rustc_hash::FxHashMap;

use crate::mesh::Mesh;

/// Triangles whose corners span more than this in `u` are treated as wrapping.
const WRAP_SPAN: f32 = 0.5;

/// A vertex closer to the Y axis than this fraction of its radius is a pole.
const POLE_EPSILON: f32 = 1e-5;

/// Duplicate seam and pole vertices so no triangle interpolates across the `u` wrap.
///
/// Must run before [`calculate_tangents`](crate::calculate_tangents). Positions,
/// normals and any tangent data are copied unchanged, so the surface does not
/// move. The triangle count is unchanged. Returns the number of added vertices.
pub fn split_uv_seam(mesh: &mut Mesh) -> usize {
    debug_assert_eq!(mesh.uvs.len(), mesh.positions.len());

    let original = mesh.vertex_count();
    let mut wrapped: FxHashMap<u32, u32> = FxHashMap::default();

    for t in 0..mesh.triangle_count() {
        let corners = [
            mesh.indices[3 * t],
            mesh.indices[3 * t + 1],
            mesh.indices[3 * t + 2],
        ];
        let polar = corners.map(|i| is_pole(mesh.positions[i as usize]));
        if polar.iter().all(|&p| p) {
            continue;
        }

        let (lo, hi) = corners
            .iter()
            .zip(polar)
            .filter(|&(_, p)| !p)
            .map(|(&i, _)| mesh.uvs[i as usize].x)
            .fold((f32::MAX, f32::MIN), |(lo, hi), u| (lo.min(u), hi.max(u)));

        if hi - lo > WRAP_SPAN {
            for (slot, &i) in corners.iter().enumerate() {
                if polar[slot] || mesh.uvs[i as usize].x >= WRAP_SPAN {
                    continue;
                }
                let copy = *wrapped
                    .entry(i)
                    .or_insert_with(|| duplicate_vertex(mesh, i, Vec2::X));
                mesh.indices[3 * t + slot] = copy;
            }
        }

        if polar.contains(&true) {
            let (sum, count) = (0..3)
                .filter(|&slot| !polar[slot])
                .map(|slot| mesh.uvs[mesh.indices[3 * t + slot] as usize].x)
                .fold((0.0f32, 0.0f32), |(sum, count), u| (sum + u, count + 1.0));
            let center = sum / count;
            for slot in (0..3).filter(|&slot| polar[slot]) {
                let pole = mesh.indices[3 * t + slot];
                let shift = Vec2::new(center - mesh.uvs[pole as usize].x, 0.0);
                mesh.indices[3 * t + slot] = duplicate_vertex(mesh, pole, shift);
            }
        }
    }

    let added = mesh.vertex_count() - original;
    tracing::debug!(
        added,
        wrapped = wrapped.len(),
        vertices = mesh.vertex_count(),
        "split uv seam"
    );
    debug_assert!(mesh.validate().is_ok());
    added
}

fn is_pole(position: Vec3) -> bool {
    let horizontal = Vec2::new(position.x, position.z).length();
    horizontal <= POLE_EPSILON * position.length()
}

/// Copy vertex `index` into every populated stream with its UV moved by `uv_shift`.
fn duplicate_vertex(mesh: &mut Mesh, index: u32, uv_shift: Vec2) -> u32 {
    let i = index as usize;
    let (position, uv, normal) = (mesh.positions[i], mesh.uvs[i], mesh.normals[i]);
    let copy = mesh.push_vertex(position, uv + uv_shift, normal);
    if mesh.tangents.len() == copy as usize {
        mesh.tangents.push(mesh.tangents[i]);
    }
    if mesh.bitangents.len() == copy as usize {
        mesh.bitangents.push(mesh.bitangents[i]);
    }
    copy
}
