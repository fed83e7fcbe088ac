//! GPU resources for one [`SceneContext`].

use planetgen_scene::SceneContext;

use crate::buffer::{BufferAllocator, MeshBuffer};
use crate::material::MaterialResources;

/// Mesh and uniform buffers for the planet, its atmosphere, the camera, and the light.
pub struct SceneBuffers {
    pub planet: MeshBuffer,
    pub atmosphere: MeshBuffer,
    /// [`CameraUniform`](planetgen_scene::CameraUniform).
    pub camera: wgpu::Buffer,
    /// [`DirectionalLightUniform`](planetgen_scene::DirectionalLightUniform).
    pub light: wgpu::Buffer,
    /// Planet model matrix, column-major `mat4x4<f32>`.
    pub planet_model: wgpu::Buffer,
    /// Layout and textures chosen by the planet's material.
    pub planet_material: MaterialResources,
}

impl SceneBuffers {
    /// Upload both meshes and create the per-frame uniforms.
    pub fn upload(allocator: &BufferAllocator<'_>, scene: &SceneContext) -> Self {
        let buffers = Self {
            planet: allocator.upload_mesh("planet", &scene.planet_mesh),
            atmosphere: allocator.upload_mesh("atmosphere", &scene.atmosphere_mesh),
            camera: allocator.create_uniform_buffer("camera-uniform", &scene.camera.to_uniform()),
            light: allocator.create_uniform_buffer("light-uniform", &scene.light.to_uniform()),
            planet_model: allocator.create_uniform_buffer(
                "planet-model-uniform",
                &scene.planet.model_matrix().to_cols_array_2d(),
            ),
            planet_material: MaterialResources::new(allocator, "planet", &scene.planet.material),
        };
        log::info!(
            "Uploaded scene: planet {} vertices, atmosphere {} vertices",
            buffers.planet.vertex_count,
            buffers.atmosphere.vertex_count
        );
        buffers
    }

    /// Write the camera, light, and planet spin of the current frame.
    pub fn write_uniforms(&self, queue: &wgpu::Queue, scene: &SceneContext) {
        queue.write_buffer(
            &self.camera,
            0,
            bytemuck::bytes_of(&scene.camera.to_uniform()),
        );
        queue.write_buffer(&self.light, 0, bytemuck::bytes_of(&scene.light.to_uniform()));
        queue.write_buffer(
            &self.planet_model,
            0,
            bytemuck::bytes_of(&scene.planet.model_matrix().to_cols_array_2d()),
        );
    }

    /// Re-upload the planet mesh and pick up its new texture after terrain regeneration.
    pub fn replace_planet_mesh(
        &mut self,
        allocator: &BufferAllocator<'_>,
        queue: &wgpu::Queue,
        scene: &SceneContext,
    ) {
        self.planet = allocator.upload_mesh("planet", &scene.planet_mesh);
        self.planet_material.refresh(queue, &scene.planet.material);
    }
}
