//! Scene description for the planet generator.
//!
//! A [`SceneContext`] owns everything a frame needs: the planet and its
//! atmosphere shell with their generated meshes, the orbit camera, the
//! directional light, and per-object [`Material`]s. It is passed explicitly to
//! whoever renders it.

pub mod camera;
pub mod error;
pub mod light;
pub mod material;
pub mod scene;

pub use camera::{CameraUniform, OrbitCamera};
pub use error::SceneError;
pub use light::{DirectionalLight, DirectionalLightUniform};
pub use material::{Material, TextureBinding, TextureKind};
pub use scene::{Atmosphere, Planet, SceneContext, SceneStats};
