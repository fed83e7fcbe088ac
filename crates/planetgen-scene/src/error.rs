use thiserror::Error;

use planetgen_config::ConfigError;
use planetgen_mesh::MeshError;

/// Errors raised while assembling or regenerating a scene.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("generated {mesh} mesh is malformed: {source}")]
    Mesh {
        mesh: &'static str,
        #[source]
        source: MeshError,
    },

    #[error("failed to spawn mesh worker: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("mesh worker '{0}' panicked")]
    WorkerPanicked(&'static str),

    #[error("light direction must not be zero")]
    ZeroLightDirection,
}
