//! Scene and runtime settings with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Output surface settings.
    pub window: WindowConfig,
    /// Planet surface generation.
    pub planet: PlanetConfig,
    /// Atmosphere shell generation.
    pub atmosphere: AtmosphereConfig,
    /// Orbiting camera.
    pub camera: CameraConfig,
    /// Directional light.
    pub light: LightConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Output surface configuration. Only the size is consumed (camera aspect ratio).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Width in logical pixels.
    pub width: u32,
    /// Height in logical pixels.
    pub height: u32,
    /// Window title.
    pub title: String,
}

/// Planet surface configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanetConfig {
    /// Radius of the undeformed sphere.
    pub base_radius: f32,
    /// Deepest terrain depression below `base_radius`.
    pub max_depth: f32,
    /// Highest terrain peak above `base_radius`.
    pub max_height: f32,
    /// Icosphere subdivision level of the surface mesh.
    pub subdivisions: u32,
    /// Terrain noise seed.
    pub seed: u32,
    /// Number of fBm octaves.
    pub octaves: u32,
    /// Frequency of the first noise octave over the unit sphere.
    pub base_frequency: f64,
    /// Offset added to noise sample points; a new offset gives a new planet.
    pub noise_offset: [f32; 3],
    /// Planet spin in radians per second.
    pub rotate_speed: f32,
    /// Index of the surface color ramp material.
    pub texture_index: u32,
}

/// Atmosphere shell configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AtmosphereConfig {
    /// Shell radius as a multiple of the planet's base radius.
    pub planet_ratio: f32,
    /// Icosphere subdivision level of the shell mesh.
    pub subdivisions: u32,
}

/// Orbit camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Distance from the planet center.
    pub distance: f32,
    /// Orbit speed in radians per second.
    pub rotate_speed: f32,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Near clip plane distance.
    pub near: f32,
    /// Far clip plane distance.
    pub far: f32,
}

/// Directional light configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightConfig {
    /// Direction the light travels (from the light toward the scene).
    pub direction: [f32; 3],
    /// Linear RGB color.
    pub color: [f32; 3],
    /// Intensity multiplier.
    pub power: f32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Enable wireframe rendering.
    pub wireframe_mode: bool,
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 1024,
            title: "Procedural Planets".to_string(),
        }
    }
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            base_radius: 90.0,
            max_depth: 30.0,
            max_height: 25.0,
            subdivisions: 7,
            seed: 0,
            octaves: 6,
            base_frequency: 1.5,
            noise_offset: [0.0; 3],
            rotate_speed: 0.03,
            texture_index: 0,
        }
    }
}

impl Default for AtmosphereConfig {
    fn default() -> Self {
        Self {
            planet_ratio: 1.12,
            subdivisions: 4,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 250.0,
            rotate_speed: 1.5,
            fov_degrees: 45.0,
            near: 0.1,
            far: 10_000.0,
        }
    }
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            direction: [-0.5, -0.5, -1.0],
            color: [1.0, 1.0, 1.0],
            power: 1.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            wireframe_mode: false,
            log_level: "info".to_string(),
        }
    }
}

impl AtmosphereConfig {
    /// Absolute shell radius for a planet of the given base radius.
    pub fn radius(&self, base_radius: f32) -> f32 {
        self.planet_ratio * base_radius
    }
}

// --- Validation ---

impl Config {
    /// Check that the values describe a scene that can be generated.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> Result<(), ConfigError> {
            Err(ConfigError::InvalidValue {
                field,
                reason: reason.into(),
            })
        }

        for (field, value) in self.float_fields() {
            if !value.is_finite() {
                return invalid(field, format!("must be finite, got {value}"));
            }
        }

        if self.planet.base_radius <= 0.0 {
            return invalid("planet.base_radius", "must be positive");
        }
        if self.planet.max_depth < 0.0 || self.planet.max_height < 0.0 {
            return invalid("planet.max_depth/max_height", "must not be negative");
        }
        if self.planet.max_depth >= self.planet.base_radius {
            return invalid("planet.max_depth", "must be smaller than base_radius");
        }
        if self.atmosphere.planet_ratio <= 0.0 {
            return invalid("atmosphere.planet_ratio", "must be positive");
        }
        if self.camera.near <= 0.0 || self.camera.far <= self.camera.near {
            return invalid("camera.near/far", "require 0 < near < far");
        }
        if self.window.width == 0 || self.window.height == 0 {
            return invalid("window", "size must be non-zero");
        }
        let [x, y, z] = self.light.direction;
        if x * x + y * y + z * z < 1e-12 {
            return invalid("light.direction", "must not be zero");
        }
        Ok(())
    }

    /// Every floating-point setting, widened to `f64`, with its dotted field name.
    fn float_fields(&self) -> Vec<(&'static str, f64)> {
        let planet = &self.planet;
        let camera = &self.camera;
        let light = &self.light;
        let mut fields = vec![
            ("planet.base_radius", f64::from(planet.base_radius)),
            ("planet.max_depth", f64::from(planet.max_depth)),
            ("planet.max_height", f64::from(planet.max_height)),
            ("planet.base_frequency", planet.base_frequency),
            ("planet.rotate_speed", f64::from(planet.rotate_speed)),
            ("atmosphere.planet_ratio", f64::from(self.atmosphere.planet_ratio)),
            ("camera.distance", f64::from(camera.distance)),
            ("camera.rotate_speed", f64::from(camera.rotate_speed)),
            ("camera.fov_degrees", f64::from(camera.fov_degrees)),
            ("camera.near", f64::from(camera.near)),
            ("camera.far", f64::from(camera.far)),
            ("light.power", f64::from(light.power)),
        ];
        const NOISE_OFFSET: [&str; 3] = [
            "planet.noise_offset[0]",
            "planet.noise_offset[1]",
            "planet.noise_offset[2]",
        ];
        const DIRECTION: [&str; 3] = [
            "light.direction[0]",
            "light.direction[1]",
            "light.direction[2]",
        ];
        const COLOR: [&str; 3] = ["light.color[0]", "light.color[1]", "light.color[2]"];
        for i in 0..3 {
            fields.push((NOISE_OFFSET[i], f64::from(planet.noise_offset[i])));
            fields.push((DIRECTION[i], f64::from(light.direction[i])));
            fields.push((COLOR[i], f64::from(light.color[i])));
        }
        fields
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(config_dir.join(CONFIG_FILE), serialized).map_err(ConfigError::WriteError)
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let contents = std::fs::read_to_string(config_dir.join(CONFIG_FILE))
            .map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
