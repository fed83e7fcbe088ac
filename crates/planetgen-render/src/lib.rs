//! GPU upload for generated planet scenes.
//!
//! Meshes become one interleaved vertex buffer plus one index buffer each, so
//! every scene object is drawn with a single indexed draw call. The planet's
//! [`Material`](planetgen_scene::Material) decides its bind group layout.

pub mod buffer;
pub mod material;
pub mod scene_buffers;

pub use buffer::{BufferAllocator, IndexData, MeshBuffer};
pub use material::{
    LIGHT_BINDING, MaterialResources, SHADOW_PARAMS_BINDING, ShadowParamsUniform,
    material_layout_entries,
};
pub use scene_buffers::SceneBuffers;
