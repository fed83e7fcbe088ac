//! Directional light: the single sun shading the planet and its atmosphere.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::Rng;

use planetgen_config::LightConfig;

use crate::error::SceneError;

/// CPU-side directional light description.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectionalLight {
    /// Normalized direction the light travels (from the light toward the scene).
    pub direction: Vec3,
    /// Linear RGB color, not premultiplied by `power`.
    pub color: Vec3,
    /// Scalar intensity multiplier.
    pub power: f32,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vec3::NEG_Y,
            color: Vec3::ONE,
            power: 1.0,
        }
    }
}

impl DirectionalLight {
    /// Build a light from its config section.
    pub fn from_config(config: &LightConfig) -> Result<Self, SceneError> {
        let mut light = Self {
            color: Vec3::from_array(config.color),
            power: config.power,
            ..Default::default()
        };
        light.set_direction(Vec3::from_array(config.direction))?;
        Ok(light)
    }

    /// Set the light direction, normalizing the input.
    ///
    /// # Errors
    ///
    /// [`SceneError::ZeroLightDirection`] if `dir` has near-zero length; the
    /// previous direction is kept.
    pub fn set_direction(&mut self, dir: Vec3) -> Result<(), SceneError> {
        let len = dir.length();
        if len.is_nan() || len <= 1e-6 {
            return Err(SceneError::ZeroLightDirection);
        }
        self.direction = dir / len;
        Ok(())
    }

    /// Point the light along a random direction drawn from the `[-1, 1]` cube.
    pub fn randomize_direction<R: Rng>(&mut self, rng: &mut R) {
        loop {
            let dir = Vec3::new(
                rng.random_range(-1.0..=1.0),
                rng.random_range(-1.0..=1.0),
                rng.random_range(-1.0..=1.0),
            );
            if self.set_direction(dir).is_ok() {
                return;
            }
        }
    }

    /// Build the GPU-side uniform from this light's properties.
    pub fn to_uniform(&self) -> DirectionalLightUniform {
        DirectionalLightUniform {
            direction_power: self.direction.extend(self.power).to_array(),
            color_padding: self.color.extend(0.0).to_array(),
        }
    }
}

/// GPU-side representation, 32 bytes, std140-compatible.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct DirectionalLightUniform {
    /// xyz = direction (normalized), w = power.
    pub direction_power: [f32; 4],
    /// xyz = color (linear RGB), w = padding.
    pub color_padding: [f32; 4],
}
