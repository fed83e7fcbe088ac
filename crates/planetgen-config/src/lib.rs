//! Configuration system for planetgen.
//!
//! Provides the scene parameters (planet, atmosphere, camera, light) and
//! runtime settings that persist to disk as RON files. Supports CLI overrides
//! via clap, hot-reload detection, and forward/backward compatible
//! serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    AtmosphereConfig, CameraConfig, Config, DebugConfig, LightConfig, PlanetConfig, WindowConfig,
};
pub use error::ConfigError;
