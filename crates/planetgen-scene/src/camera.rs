//! Orbit camera circling the planet center.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use planetgen_config::CameraConfig;

/// Polar angle is kept just short of the poles so `look_at` never degenerates.
pub const POLAR_LIMIT: f32 = 1.57;

/// Allowed range for the orbit distance.
pub const DISTANCE_RANGE: (f32, f32) = (10.0, 10_000.0);

/// A camera on a sphere around the origin, always looking at the origin with +Y up.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    /// Distance from the origin.
    pub distance: f32,
    /// Angle around the Y axis, radians. Zero places the camera on +X.
    pub azimuth: f32,
    /// Elevation above the XZ plane, radians, in `[-POLAR_LIMIT, POLAR_LIMIT]`.
    pub polar: f32,
    /// Orbit speed in radians per second of input.
    pub rotate_speed: f32,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height.
    pub aspect_ratio: f32,
    /// Near clip plane distance.
    pub near: f32,
    /// Far clip plane distance.
    pub far: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default(), 1.0)
    }
}

impl OrbitCamera {
    /// Build a camera from its config section and the output aspect ratio.
    pub fn from_config(config: &CameraConfig, aspect_ratio: f32) -> Self {
        Self {
            distance: config.distance.clamp(DISTANCE_RANGE.0, DISTANCE_RANGE.1),
            azimuth: 0.0,
            polar: 0.0,
            rotate_speed: config.rotate_speed,
            fov_y: config.fov_degrees.to_radians(),
            aspect_ratio,
            near: config.near,
            far: config.far,
        }
    }

    /// World-space eye position.
    pub fn position(&self) -> Vec3 {
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        let (sin_pol, cos_pol) = self.polar.sin_cos();
        self.distance * Vec3::new(cos_az * cos_pol, sin_pol, sin_az * cos_pol)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), Vec3::ZERO, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.near, self.far)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Orbit by directional input over `dt` seconds.
    ///
    /// `azimuth_input` and `polar_input` are typically -1, 0 or 1 (key state).
    /// The polar angle is clamped to `±POLAR_LIMIT`.
    pub fn orbit(&mut self, azimuth_input: f32, polar_input: f32, dt: f32) {
        let step = dt * self.rotate_speed;
        self.azimuth += azimuth_input * step;
        self.polar = (self.polar + polar_input * step).clamp(-POLAR_LIMIT, POLAR_LIMIT);
    }

    /// Move toward (`delta < 0`) or away from the origin, within `DISTANCE_RANGE`.
    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance + delta).clamp(DISTANCE_RANGE.0, DISTANCE_RANGE.1);
    }

    /// Update the aspect ratio from a surface size. Zero-height sizes are ignored.
    pub fn set_aspect_ratio(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect_ratio = width as f32 / height as f32;
        }
    }

    /// Convert the camera to a uniform suitable for GPU upload.
    pub fn to_uniform(&self) -> CameraUniform {
        let p = self.position();
        CameraUniform {
            view_proj: self.view_projection_matrix().to_cols_array_2d(),
            camera_pos: [p.x, p.y, p.z, 0.0],
        }
    }
}

/// GPU-side camera data, 80 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    /// Column-major view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// xyz = eye position in world space, w = padding.
    pub camera_pos: [f32; 4],
}
