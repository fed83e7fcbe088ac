//! Icosphere generation by recursive midpoint subdivision of an icosahedron.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};
use rustc_hash::FxHashMap;

use crate::icosahedron::{ICOSAHEDRON_INDICES, ICOSAHEDRON_VERTICES};
use crate::mesh::Mesh;
use crate::winding::reverse_faces;

/// How edge midpoints are created while subdividing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MidpointStrategy {
    /// Every triangle emits its own three midpoints. Edges shared by two
    /// triangles therefore produce two coincident vertices.
    #[default]
    PerTriangle,
    /// Midpoints are cached per undirected edge, yielding a closed manifold
    /// with `10 * 4^n + 2` vertices.
    Shared,
}

/// Parameters for [`generate_sphere_with`].
#[derive(Debug, Clone, PartialEq)]
pub struct SphereParams {
    /// Distance of every vertex from the origin. Must be positive.
    pub radius: f32,
    /// Number of 1-to-4 splits applied to the icosahedron.
    pub subdivisions: u32,
    /// Midpoint creation strategy.
    pub midpoints: MidpointStrategy,
    /// Reverse every face so the sphere is visible from inside.
    pub reversed: bool,
}

impl Default for SphereParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            subdivisions: 4,
            midpoints: MidpointStrategy::PerTriangle,
            reversed: false,
        }
    }
}

impl SphereParams {
    /// Parameters for an outward-facing sphere with per-triangle midpoints.
    pub fn new(radius: f32, subdivisions: u32) -> Self {
        Self {
            radius,
            subdivisions,
            ..Default::default()
        }
    }
}

/// Generate an icosphere of the given radius and subdivision level.
///
/// Level 0 is the bare icosahedron (12 vertices, 20 faces); each level
/// multiplies the face count by 4. Normals are `position / radius` and UVs use
/// an equirectangular mapping of the normal.
pub fn generate_sphere(radius: f32, subdivisions: u32) -> Mesh {
    generate_sphere_with(&SphereParams::new(radius, subdivisions))
}

/// Generate an icosphere from explicit [`SphereParams`].
pub fn generate_sphere_with(params: &SphereParams) -> Mesh {
    debug_assert!(params.radius > 0.0, "sphere radius must be positive");
    let radius = params.radius;

    let mut positions: Vec<Vec3> = ICOSAHEDRON_VERTICES
        .iter()
        .map(|v| v.normalize() * radius)
        .collect();
    let mut indices = ICOSAHEDRON_INDICES.to_vec();

    for _ in 0..params.subdivisions {
        indices = match params.midpoints {
            MidpointStrategy::PerTriangle => {
                subdivide_per_triangle(&mut positions, &indices, radius)
            }
            MidpointStrategy::Shared => subdivide_shared(&mut positions, &indices, radius),
        };
    }

    let normals: Vec<Vec3> = positions.iter().map(|p| *p / radius).collect();
    let uvs = normals.iter().map(|n| equirectangular_uv(*n)).collect();

    let mut mesh = Mesh {
        positions,
        uvs,
        normals,
        indices,
        ..Default::default()
    };

    if params.reversed {
        reverse_faces(&mut mesh);
    }

    tracing::debug!(
        radius,
        subdivisions = params.subdivisions,
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "generated icosphere"
    );
    debug_assert!(mesh.validate().is_ok());

    mesh
}

/// Equirectangular texture coordinate for a unit direction.
///
/// `u` wraps around the Y axis, `v` runs from the north pole (0) to the south pole (1).
pub fn equirectangular_uv(direction: Vec3) -> Vec2 {
    let u = 0.5 + direction.z.atan2(direction.x) / TAU;
    let v = 0.5 - direction.y.clamp(-1.0, 1.0).asin() / PI;
    Vec2::new(u, v)
}

#[inline]
fn midpoint(a: Vec3, b: Vec3, radius: f32) -> Vec3 {
    (a + b).normalize() * radius
}

#[inline]
fn push(positions: &mut Vec<Vec3>, p: Vec3) -> u32 {
    positions.push(p);
    (positions.len() - 1) as u32
}

/// Split each triangle into four, appending three fresh midpoints per triangle.
fn subdivide_per_triangle(positions: &mut Vec<Vec3>, indices: &[u32], radius: f32) -> Vec<u32> {
    positions.reserve(indices.len());
    let mut out = Vec::with_capacity(indices.len() * 4);

    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (tri[0], tri[1], tri[2]);
        let (pa, pb, pc) = (
            positions[a as usize],
            positions[b as usize],
            positions[c as usize],
        );

        let ab = push(positions, midpoint(pa, pb, radius));
        let bc = push(positions, midpoint(pb, pc, radius));
        let ca = push(positions, midpoint(pc, pa, radius));

        out.extend_from_slice(&[a, ab, ca]);
        out.extend_from_slice(&[b, bc, ab]);
        out.extend_from_slice(&[c, ca, bc]);
        out.extend_from_slice(&[ab, bc, ca]);
    }

    out
}

/// Split each triangle into four, sharing midpoints between adjacent triangles.
fn subdivide_shared(positions: &mut Vec<Vec3>, indices: &[u32], radius: f32) -> Vec<u32> {
    let mut cache: FxHashMap<(u32, u32), u32> = FxHashMap::default();
    let mut out = Vec::with_capacity(indices.len() * 4);

    let mut get_midpoint = |a: u32, b: u32, positions: &mut Vec<Vec3>| -> u32 {
        let key = if a < b { (a, b) } else { (b, a) };
        *cache.entry(key).or_insert_with(|| {
            let p = midpoint(positions[a as usize], positions[b as usize], radius);
            push(positions, p)
        })
    };

    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (tri[0], tri[1], tri[2]);
        let ab = get_midpoint(a, b, positions);
        let bc = get_midpoint(b, c, positions);
        let ca = get_midpoint(c, a, positions);

        out.extend_from_slice(&[a, ab, ca]);
        out.extend_from_slice(&[b, bc, ab]);
        out.extend_from_slice(&[c, ca, bc]);
        out.extend_from_slice(&[ab, bc, ca]);
    }

    out
}
