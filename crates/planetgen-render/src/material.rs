//! Bind group layouts and uniforms derived from a [`Material`].
//!
//! Binding numbers:
//!
//! | Binding | Content |
//! |---------|---------|
//! | `2 * slot` | texture of [`TextureBinding`] `slot` |
//! | `2 * slot + 1` | its sampler (comparison sampler for depth) |
//! | [`LIGHT_BINDING`] | `DirectionalLightUniform`, lit materials only |
//! | [`SHADOW_PARAMS_BINDING`] | [`ShadowParamsUniform`], shadow-mapped materials only |

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use planetgen_scene::{DirectionalLightUniform, Material, TextureBinding, TextureKind};

use crate::buffer::BufferAllocator;

pub const LIGHT_BINDING: u32 = 4;
pub const SHADOW_PARAMS_BINDING: u32 = 5;

/// Shadow comparison parameters, padded to 16 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ShadowParamsUniform {
    pub bias: f32,
    pub _padding: [f32; 3],
}

impl ShadowParamsUniform {
    /// Parameters for `material`, or `None` when it samples no shadow map.
    pub fn from_material(material: &Material) -> Option<Self> {
        match *material {
            Material::ShadowMapped { shadow_bias, .. } => Some(Self {
                bias: shadow_bias,
                _padding: [0.0; 3],
            }),
            Material::Simple { .. } | Material::Volume { .. } => None,
        }
    }
}

/// Layout entries for the bind group that `material` is drawn with.
pub fn material_layout_entries(material: &Material) -> Vec<wgpu::BindGroupLayoutEntry> {
    let mut entries = Vec::new();

    for binding in material.texture_bindings() {
        let (sample_type, view_dimension, sampler) = match binding.kind {
            TextureKind::Color2d => (
                wgpu::TextureSampleType::Float { filterable: true },
                wgpu::TextureViewDimension::D2,
                wgpu::SamplerBindingType::Filtering,
            ),
            TextureKind::Volume3d => (
                wgpu::TextureSampleType::Float { filterable: true },
                wgpu::TextureViewDimension::D3,
                wgpu::SamplerBindingType::Filtering,
            ),
            TextureKind::Depth2d => (
                wgpu::TextureSampleType::Depth,
                wgpu::TextureViewDimension::D2,
                wgpu::SamplerBindingType::Comparison,
            ),
        };
        entries.push(wgpu::BindGroupLayoutEntry {
            binding: 2 * binding.slot,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type,
                view_dimension,
                multisampled: false,
            },
            count: None,
        });
        entries.push(wgpu::BindGroupLayoutEntry {
            binding: 2 * binding.slot + 1,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(sampler),
            count: None,
        });
    }

    if material.is_lit() {
        entries.push(uniform_entry(
            LIGHT_BINDING,
            std::mem::size_of::<DirectionalLightUniform>(),
        ));
    }
    if material.casts_shadows() {
        entries.push(uniform_entry(
            SHADOW_PARAMS_BINDING,
            std::mem::size_of::<ShadowParamsUniform>(),
        ));
    }

    entries
}

fn uniform_entry(binding: u32, size: usize) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: NonZeroU64::new(size as u64),
        },
        count: None,
    }
}

/// GPU-side state for one material: its layout, textures to bind, and shadow uniform.
pub struct MaterialResources {
    pub layout: wgpu::BindGroupLayout,
    /// Textures the draw needs, refreshed when the material's texture changes.
    pub textures: Vec<TextureBinding>,
    /// Present only for shadow-mapped materials.
    pub shadow_params: Option<wgpu::Buffer>,
}

impl MaterialResources {
    pub fn new(allocator: &BufferAllocator<'_>, label: &str, material: &Material) -> Self {
        let entries = material_layout_entries(material);
        let layout = allocator
            .device()
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(&format!("{label}-material-layout")),
                entries: &entries,
            });
        let shadow_params = ShadowParamsUniform::from_material(material).map(|params| {
            allocator.create_uniform_buffer(&format!("{label}-shadow-params"), &params)
        });

        log::debug!(
            "Material '{label}': {} layout entries, lit = {}, shadows = {}",
            entries.len(),
            material.is_lit(),
            material.casts_shadows()
        );
        Self {
            layout,
            textures: material.texture_bindings(),
            shadow_params,
        }
    }

    /// Pick up texture and bias changes made to `material` since creation.
    pub fn refresh(&mut self, queue: &wgpu::Queue, material: &Material) {
        self.textures = material.texture_bindings();
        if let (Some(buffer), Some(params)) = (
            &self.shadow_params,
            ShadowParamsUniform::from_material(material),
        ) {
            queue.write_buffer(buffer, 0, bytemuck::bytes_of(&params));
        }
    }
}
