//! Material variants consumed by the renderer.
//!
//! Meshes carry no material data; each scene object pairs a mesh with one of
//! these. The renderer dispatches on the variant to decide which textures to
//! bind and whether the light uniform is needed.

/// Kind of texture a binding expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKind {
    /// 2D color texture (surface color ramp).
    Color2d,
    /// 3D volume texture.
    Volume3d,
    /// 2D depth texture sampled for shadows.
    Depth2d,
}

/// One texture the renderer must bind for a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureBinding {
    /// Binding slot within the material's bind group.
    pub slot: u32,
    pub kind: TextureKind,
    /// Index into the renderer's texture table.
    pub texture: u32,
}

/// Capability-tagged material.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// Lit surface with a color texture.
    Simple { texture_index: u32 },
    /// Unlit volume sampled from a 3D texture.
    Volume { volume_texture: u32 },
    /// Lit surface with a color texture and a shadow map.
    ShadowMapped {
        texture_index: u32,
        depth_texture: u32,
        /// Depth bias applied before the shadow comparison.
        shadow_bias: f32,
    },
}

impl Default for Material {
    fn default() -> Self {
        Material::Simple { texture_index: 0 }
    }
}

impl Material {
    /// Whether the directional light uniform must be bound.
    pub fn is_lit(&self) -> bool {
        !matches!(self, Material::Volume { .. })
    }

    pub fn casts_shadows(&self) -> bool {
        matches!(self, Material::ShadowMapped { .. })
    }

    /// The color texture index, if this material has one.
    pub fn color_texture(&self) -> Option<u32> {
        match *self {
            Material::Simple { texture_index } | Material::ShadowMapped { texture_index, .. } => {
                Some(texture_index)
            }
            Material::Volume { .. } => None,
        }
    }

    /// Replace the color texture. Returns `false` for materials without one.
    pub fn set_color_texture(&mut self, index: u32) -> bool {
        match self {
            Material::Simple { texture_index } | Material::ShadowMapped { texture_index, .. } => {
                *texture_index = index;
                true
            }
            Material::Volume { .. } => false,
        }
    }

    /// Textures to bind, in slot order.
    pub fn texture_bindings(&self) -> Vec<TextureBinding> {
        match *self {
            Material::Simple { texture_index } => vec![TextureBinding {
                slot: 0,
                kind: TextureKind::Color2d,
                texture: texture_index,
            }],
            Material::Volume { volume_texture } => vec![TextureBinding {
                slot: 0,
                kind: TextureKind::Volume3d,
                texture: volume_texture,
            }],
            Material::ShadowMapped {
                texture_index,
                depth_texture,
                ..
            } => vec![
                TextureBinding {
                    slot: 0,
                    kind: TextureKind::Color2d,
                    texture: texture_index,
                },
                TextureBinding {
                    slot: 1,
                    kind: TextureKind::Depth2d,
                    texture: depth_texture,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_binds_one_color_texture() {
        let material = Material::Simple { texture_index: 2 };
        assert!(material.is_lit());
        assert!(!material.casts_shadows());
        assert_eq!(
            material.texture_bindings(),
            vec![TextureBinding {
                slot: 0,
                kind: TextureKind::Color2d,
                texture: 2
            }]
        );
    }

    #[test]
    fn test_volume_is_unlit_without_color() {
        let mut material = Material::Volume { volume_texture: 5 };
        assert!(!material.is_lit());
        assert_eq!(material.color_texture(), None);
        assert!(!material.set_color_texture(1));
        assert_eq!(material.texture_bindings()[0].kind, TextureKind::Volume3d);
    }

    #[test]
    fn test_shadow_mapped_binds_depth_after_color() {
        let material = Material::ShadowMapped {
            texture_index: 1,
            depth_texture: 7,
            shadow_bias: 0.005,
        };
        assert!(material.is_lit());
        assert!(material.casts_shadows());
        let bindings = material.texture_bindings();
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[0].kind, TextureKind::Color2d);
        assert_eq!(bindings[1].slot, 1);
        assert_eq!(bindings[1].texture, 7);
    }

    #[test]
    fn test_set_color_texture() {
        let mut material = Material::default();
        assert!(material.set_color_texture(3));
        assert_eq!(material.color_texture(), Some(3));
    }
}
