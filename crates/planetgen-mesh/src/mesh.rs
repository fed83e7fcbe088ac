//! Indexed mesh storage: parallel attribute arrays plus a triangle index list.

use glam::{Vec2, Vec3};

/// Errors reported by [`Mesh::validate`] when a mesh breaks its invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeshError {
    /// The index list does not describe whole triangles.
    #[error("index count {0} is not a multiple of 3")]
    PartialTriangle(usize),

    /// An index points past the end of the position array.
    #[error("index {index} at slot {slot} is out of range (vertex count = {vertex_count})")]
    IndexOutOfRange {
        slot: usize,
        index: u32,
        vertex_count: usize,
    },

    /// A non-empty attribute stream has a different length than `positions`.
    #[error("{attribute} has {len} entries, expected {expected}")]
    AttributeLength {
        attribute: &'static str,
        len: usize,
        expected: usize,
    },
}

/// A triangulated surface stored as an arena of vertex attributes and integer indices.
///
/// Every non-empty attribute array is parallel to `positions`. `tangents` and
/// `bitangents` stay empty until [`calculate_tangents`](crate::calculate_tangents)
/// has run on the mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Unique vertex positions in first-discovery order.
    pub positions: Vec<Vec3>,
    /// Texture coordinates, one per position.
    pub uvs: Vec<Vec2>,
    /// Unit normals, one per position.
    pub normals: Vec<Vec3>,
    /// Per-vertex tangents (empty when tangent space was not generated).
    pub tangents: Vec<Vec3>,
    /// Per-vertex bitangents (empty when tangent space was not generated).
    pub bitangents: Vec<Vec3>,
    /// Triangle list; each consecutive triple is one face.
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of unique vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles described by `indices`.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether tangent and bitangent streams are populated.
    pub fn has_tangents(&self) -> bool {
        !self.tangents.is_empty() && self.tangents.len() == self.positions.len()
    }

    /// Iterate over triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Append a vertex to every populated stream and return its index.
    pub(crate) fn push_vertex(&mut self, position: Vec3, uv: Vec2, normal: Vec3) -> u32 {
        self.positions.push(position);
        self.uvs.push(uv);
        self.normals.push(normal);
        (self.positions.len() - 1) as u32
    }

    /// Check the structural invariants of the mesh.
    ///
    /// # Errors
    ///
    /// Returns the first [`MeshError`] found.
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::PartialTriangle(self.indices.len()));
        }

        let expected = self.positions.len();
        let streams = [
            ("uvs", self.uvs.len()),
            ("normals", self.normals.len()),
            ("tangents", self.tangents.len()),
            ("bitangents", self.bitangents.len()),
        ];
        for (attribute, len) in streams {
            if len != 0 && len != expected {
                return Err(MeshError::AttributeLength {
                    attribute,
                    len,
                    expected,
                });
            }
        }

        if let Some((slot, &index)) = self
            .indices
            .iter()
            .enumerate()
            .find(|&(_, &i)| i as usize >= expected)
        {
            return Err(MeshError::IndexOutOfRange {
                slot,
                index,
                vertex_count: expected,
            });
        }

        Ok(())
    }

    /// Expand the mesh into a triangle soup with one entry per triangle corner.
    ///
    /// Optional streams that are empty on the mesh stay empty on the result.
    pub fn to_flat(&self) -> FlatMesh {
        fn gather<T: Copy>(src: &[T], indices: &[u32]) -> Vec<T> {
            if src.is_empty() {
                return Vec::new();
            }
            indices.iter().map(|&i| src[i as usize]).collect()
        }

        FlatMesh {
            positions: gather(&self.positions, &self.indices),
            uvs: gather(&self.uvs, &self.indices),
            normals: gather(&self.normals, &self.indices),
            tangents: gather(&self.tangents, &self.indices),
            bitangents: gather(&self.bitangents, &self.indices),
        }
    }

    /// Re-index this mesh under the given welding policy.
    pub fn welded(&self, policy: crate::WeldPolicy) -> Mesh {
        crate::index_mesh(&self.to_flat(), policy)
    }
}

/// A non-indexed triangle soup: every consecutive triple of entries is one triangle.
///
/// `uvs` and `normals` must be parallel to `positions`. `tangents` and
/// `bitangents` are either empty or parallel as well.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatMesh {
    pub positions: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub normals: Vec<Vec3>,
    pub tangents: Vec<Vec3>,
    pub bitangents: Vec<Vec3>,
}

impl FlatMesh {
    /// Number of vertex occurrences (three per triangle).
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the soup holds no vertices.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Whether tangent and bitangent streams are present.
    pub fn has_tangents(&self) -> bool {
        !self.tangents.is_empty()
    }
}
