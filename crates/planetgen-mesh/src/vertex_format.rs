//! Interleaved GPU vertex format and its canonical `wgpu::VertexBufferLayout`.
//!
//! ## Attribute Packing
//!
//! | Location | Offset | Format    | Field     |
//! |----------|--------|-----------|-----------|
//! | 0        | 0      | Float32x3 | position  |
//! | 1        | 12     | Float32x3 | normal    |
//! | 2        | 24     | Float32x2 | uv        |
//! | 3        | 32     | Float32x3 | tangent   |
//! | 4        | 44     | Float32x3 | bitangent |

use std::mem;

use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;
use wgpu::{VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

use crate::mesh::Mesh;

/// One interleaved vertex as uploaded to the GPU.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct PlanetVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
}

const_assert_eq!(mem::size_of::<PlanetVertex>(), 56);

/// Vertex attributes for [`PlanetVertex`], shader locations 0 through 4.
pub const PLANET_VERTEX_ATTRIBUTES: [VertexAttribute; 5] = [
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 0,
        shader_location: 0,
    },
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 12,
        shader_location: 1,
    },
    VertexAttribute {
        format: VertexFormat::Float32x2,
        offset: 24,
        shader_location: 2,
    },
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 32,
        shader_location: 3,
    },
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 44,
        shader_location: 4,
    },
];

/// The vertex buffer layout shared by the planet and atmosphere pipelines.
pub const PLANET_VERTEX_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: mem::size_of::<PlanetVertex>() as u64,
    step_mode: VertexStepMode::Vertex,
    attributes: &PLANET_VERTEX_ATTRIBUTES,
};

// Offsets must match the struct fields.
const _: () = assert!(PLANET_VERTEX_ATTRIBUTES[1].offset == mem::offset_of!(PlanetVertex, normal) as u64);
const _: () = assert!(PLANET_VERTEX_ATTRIBUTES[2].offset == mem::offset_of!(PlanetVertex, uv) as u64);
const _: () = assert!(PLANET_VERTEX_ATTRIBUTES[3].offset == mem::offset_of!(PlanetVertex, tangent) as u64);
const _: () =
    assert!(PLANET_VERTEX_ATTRIBUTES[4].offset == mem::offset_of!(PlanetVertex, bitangent) as u64);

/// Interleave the mesh's attribute streams into GPU vertices.
///
/// Streams that are empty on the mesh (UVs, normals, tangents) are written as zeros.
pub fn interleave(mesh: &Mesh) -> Vec<PlanetVertex> {
    fn at<T: Copy + Default>(stream: &[T], i: usize) -> T {
        stream.get(i).copied().unwrap_or_default()
    }

    (0..mesh.vertex_count())
        .map(|i| PlanetVertex {
            position: mesh.positions[i].to_array(),
            normal: at(&mesh.normals, i).to_array(),
            uv: at(&mesh.uvs, i).to_array(),
            tangent: at(&mesh.tangents, i).to_array(),
            bitangent: at(&mesh.bitangents, i).to_array(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{calculate_tangents, generate_sphere, quad};
    use glam::Vec2;

    #[test]
    fn test_layout_stride_matches_vertex_struct_size() {
        assert_eq!(
            PLANET_VERTEX_LAYOUT.array_stride,
            mem::size_of::<PlanetVertex>() as u64,
        );
    }

    #[test]
    fn test_shader_locations_are_sequential() {
        for (i, attr) in PLANET_VERTEX_ATTRIBUTES.iter().enumerate() {
            assert_eq!(attr.shader_location, i as u32);
        }
    }

    #[test]
    fn test_interleave_copies_streams() {
        let mut mesh = quad(Vec2::ZERO, Vec2::new(2.0, 1.0));
        calculate_tangents(&mut mesh);
        let vertices = interleave(&mesh);

        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices[3].position, [2.0, 1.0, 0.0]);
        assert_eq!(vertices[3].uv, [1.0, 1.0]);
        assert_eq!(vertices[0].normal, [0.0, 0.0, -1.0]);
        assert_eq!(vertices[0].tangent, mesh.tangents[0].to_array());
    }

    #[test]
    fn test_interleave_zero_fills_missing_tangents() {
        let mesh = generate_sphere(1.0, 0);
        let vertices = interleave(&mesh);
        assert_eq!(vertices.len(), 12);
        assert!(vertices.iter().all(|v| v.tangent == [0.0; 3]));
    }

    #[test]
    fn test_byte_size_matches_stride() {
        let mesh = generate_sphere(1.0, 1);
        let vertices = interleave(&mesh);
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len() as u64, vertices.len() as u64 * PLANET_VERTEX_LAYOUT.array_stride);
    }

    #[test]
    fn test_layout_is_valid_for_wgpu_pipeline() {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            force_fallback_adapter: true,
            ..Default::default()
        }));

        let Ok(adapter) = adapter else {
            // No adapter available (headless CI without GPU).
            return;
        };

        let Ok((device, _queue)) =
            pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default()))
        else {
            return;
        };

        let shader_source = r#"
            @vertex
            fn vs_main(
                @location(0) position: vec3<f32>,
                @location(1) normal: vec3<f32>,
                @location(2) uv: vec2<f32>,
                @location(3) tangent: vec3<f32>,
                @location(4) bitangent: vec3<f32>,
            ) -> @builtin(position) vec4<f32> {
                return vec4<f32>(position + normal * 0.0 + tangent * uv.x * 0.0 + bitangent * 0.0, 1.0);
            }

            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                return vec4<f32>(1.0, 1.0, 1.0, 1.0);
            }
        "#;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("test_planet_shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let _pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("test_planet_pipeline"),
            layout: None,
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[PLANET_VERTEX_LAYOUT],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: wgpu::TextureFormat::Bgra8UnormSrgb,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview_mask: None,
            cache: None,
        });
    }
}
