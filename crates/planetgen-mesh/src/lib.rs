//! Planet mesh generation: icosphere subdivision, vertex welding, tangent space, and face winding.
//!
//! The typical pipeline for a planet surface is
//! [`generate_sphere_with`] → [`displace_terrain`] → [`split_uv_seam`] → [`calculate_tangents`]
//! → [`interleave`];
//! an atmosphere shell is a plain sphere with `reversed: true`.

pub mod icosahedron;
pub mod indexer;
pub mod mesh;
pub mod primitives;
pub mod seam;
pub mod sphere;
pub mod tangents;
pub mod terrain;
pub mod vertex_format;
pub mod winding;

pub use icosahedron::{ICOSAHEDRON_FACE_COUNT, ICOSAHEDRON_INDICES, ICOSAHEDRON_VERTICES};
pub use indexer::{WELD_TOLERANCE, WeldPolicy, index_mesh};
pub use mesh::{FlatMesh, Mesh, MeshError};
pub use primitives::{cube, quad};
pub use seam::split_uv_seam;
pub use sphere::{
    MidpointStrategy, SphereParams, equirectangular_uv, generate_sphere, generate_sphere_with,
};
pub use tangents::{DEGENERATE_UV_EPSILON, calculate_tangents, triangle_tangents};
pub use terrain::{TerrainParams, TerrainSampler, displace_terrain, recompute_normals};
pub use vertex_format::{PLANET_VERTEX_ATTRIBUTES, PLANET_VERTEX_LAYOUT, PlanetVertex, interleave};
pub use winding::{reverse_faces, reverse_winding, triangle_winds_outward};
