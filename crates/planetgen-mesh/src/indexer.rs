//! Vertex welding: converts a triangle soup into an indexed mesh.
//!
//! Three matching policies are available through [`WeldPolicy`]:
//!
//! | Policy      | Match rule                                          | Cost   |
//! |-------------|-----------------------------------------------------|--------|
//! | `Exact`     | all attributes bitwise equal (`-0.0 == 0.0`)        | O(n)   |
//! | `Tolerance` | position/uv/normal components within `eps`          | O(n²)  |
//! | `Distinct`  | never; one output vertex per input corner           | O(n)   |

use glam::{Vec2, Vec3};
use rustc_hash::FxHashMap;

use crate::mesh::{FlatMesh, Mesh};

/// Default component tolerance for [`WeldPolicy::Tolerance`].
pub const WELD_TOLERANCE: f32 = 0.01;

/// Rule deciding whether two vertex occurrences are the same vertex.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum WeldPolicy {
    /// Structural equality of every attribute, via hashing of the float bits.
    #[default]
    Exact,
    /// Every position, UV and normal component differs by less than the given
    /// absolute tolerance. Tangents of merged occurrences are averaged.
    Tolerance(f32),
    /// Every occurrence becomes its own vertex.
    Distinct,
}

impl WeldPolicy {
    /// Tolerance-based welding with [`WELD_TOLERANCE`].
    pub fn tolerance() -> Self {
        Self::Tolerance(WELD_TOLERANCE)
    }
}

/// Hash key of one vertex occurrence. Floats are keyed by their bit pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PackedVertex([u32; 14]);

impl PackedVertex {
    fn new(flat: &FlatMesh, i: usize) -> Self {
        let mut key = [0u32; 14];
        let p = flat.positions[i];
        let uv = flat.uvs[i];
        let n = flat.normals[i];
        let (t, b) = if flat.has_tangents() {
            (flat.tangents[i], flat.bitangents[i])
        } else {
            (Vec3::ZERO, Vec3::ZERO)
        };

        let components = [
            p.x, p.y, p.z, uv.x, uv.y, n.x, n.y, n.z, t.x, t.y, t.z, b.x, b.y, b.z,
        ];
        for (slot, c) in key.iter_mut().zip(components) {
            // Adding 0.0 folds -0.0 into +0.0 so the two zeros share a key.
            *slot = (c + 0.0).to_bits();
        }
        Self(key)
    }
}

/// Build an indexed mesh from a triangle soup.
///
/// The output has exactly one index per input occurrence. Vertices are
/// appended in first-discovery order; a matched occurrence reuses the index
/// of the earlier vertex and appends nothing.
///
/// The input streams must be parallel (`tangents`/`bitangents` may be empty).
pub fn index_mesh(flat: &FlatMesh, policy: WeldPolicy) -> Mesh {
    debug_assert_eq!(flat.uvs.len(), flat.len(), "uv stream length mismatch");
    debug_assert_eq!(flat.normals.len(), flat.len(), "normal stream length mismatch");
    debug_assert!(
        !flat.has_tangents()
            || (flat.tangents.len() == flat.len() && flat.bitangents.len() == flat.len()),
        "tangent stream length mismatch"
    );

    let mesh = match policy {
        WeldPolicy::Exact => index_exact(flat),
        WeldPolicy::Tolerance(eps) => index_tolerance(flat, eps),
        WeldPolicy::Distinct => index_distinct(flat),
    };

    tracing::debug!(
        ?policy,
        input = flat.len(),
        output = mesh.vertex_count(),
        "indexed triangle soup"
    );

    mesh
}

fn with_capacity(flat: &FlatMesh) -> Mesh {
    let n = flat.len();
    let tangent_capacity = if flat.has_tangents() { n } else { 0 };
    Mesh {
        positions: Vec::with_capacity(n),
        uvs: Vec::with_capacity(n),
        normals: Vec::with_capacity(n),
        tangents: Vec::with_capacity(tangent_capacity),
        bitangents: Vec::with_capacity(tangent_capacity),
        indices: Vec::with_capacity(n),
    }
}

/// Append occurrence `i` of `flat` to every output stream and return its new index.
fn emit(out: &mut Mesh, flat: &FlatMesh, i: usize) -> u32 {
    let index = out.push_vertex(flat.positions[i], flat.uvs[i], flat.normals[i]);
    if flat.has_tangents() {
        out.tangents.push(flat.tangents[i]);
        out.bitangents.push(flat.bitangents[i]);
    }
    index
}

fn index_exact(flat: &FlatMesh) -> Mesh {
    let mut out = with_capacity(flat);
    let mut lookup: FxHashMap<PackedVertex, u32> = FxHashMap::default();

    for i in 0..flat.len() {
        let key = PackedVertex::new(flat, i);
        let index = match lookup.get(&key) {
            Some(&existing) => existing,
            None => {
                let index = emit(&mut out, flat, i);
                lookup.insert(key, index);
                index
            }
        };
        out.indices.push(index);
    }

    out
}

#[inline]
fn near(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() < eps
}

#[inline]
fn near3(a: Vec3, b: Vec3, eps: f32) -> bool {
    near(a.x, b.x, eps) && near(a.y, b.y, eps) && near(a.z, b.z, eps)
}

#[inline]
fn near2(a: Vec2, b: Vec2, eps: f32) -> bool {
    near(a.x, b.x, eps) && near(a.y, b.y, eps)
}

fn find_similar(out: &Mesh, position: Vec3, uv: Vec2, normal: Vec3, eps: f32) -> Option<u32> {
    (0..out.positions.len())
        .find(|&j| {
            near3(position, out.positions[j], eps)
                && near2(uv, out.uvs[j], eps)
                && near3(normal, out.normals[j], eps)
        })
        .map(|j| j as u32)
}

fn index_tolerance(flat: &FlatMesh, eps: f32) -> Mesh {
    let mut out = with_capacity(flat);

    for i in 0..flat.len() {
        let found = find_similar(&out, flat.positions[i], flat.uvs[i], flat.normals[i], eps);
        let index = match found {
            Some(existing) => {
                if flat.has_tangents() {
                    out.tangents[existing as usize] += flat.tangents[i];
                    out.bitangents[existing as usize] += flat.bitangents[i];
                }
                existing
            }
            None => emit(&mut out, flat, i),
        };
        out.indices.push(index);
    }

    // Merged tangents were summed; bring them back to unit length.
    for t in out.tangents.iter_mut().chain(out.bitangents.iter_mut()) {
        *t = t.normalize_or_zero();
    }

    out
}

fn index_distinct(flat: &FlatMesh) -> Mesh {
    let mut out = with_capacity(flat);
    for i in 0..flat.len() {
        let index = emit(&mut out, flat, i);
        out.indices.push(index);
    }
    out
}
