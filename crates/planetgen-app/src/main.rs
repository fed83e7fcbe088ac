//! Headless planet generator: loads the config, builds the scene, reports mesh sizes.

mod platform;

use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;

use planetgen_config::{CliArgs, Config, ConfigError};
use planetgen_scene::{SceneContext, SceneError, SceneStats};

use crate::platform::{PlatformDirs, PlatformError};

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Resolve directories and produce the effective config (file + CLI overrides).
fn load_config(args: &CliArgs) -> Result<(PlatformDirs, Config), AppError> {
    let dirs = PlatformDirs::resolve_for(args.config.as_deref())?;
    dirs.create_dirs()?;

    let mut config = Config::load_or_create(&dirs.config_dir)?;
    config.apply_cli_overrides(args);
    config.validate()?;
    Ok((dirs, config))
}

fn report(stats: &SceneStats) {
    println!(
        "planet:     {:>8} vertices {:>8} triangles",
        stats.planet_vertices, stats.planet_triangles
    );
    println!(
        "atmosphere: {:>8} vertices {:>8} triangles",
        stats.atmosphere_vertices, stats.atmosphere_triangles
    );
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let (dirs, config) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            // Logging is configured from the config, so it is not up yet.
            eprintln!("{}: {e}", platform::APP_NAME);
            return ExitCode::FAILURE;
        }
    };

    planetgen_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));
    tracing::info!(
        config_dir = %dirs.config_dir.display(),
        radius = config.planet.base_radius,
        subdivisions = config.planet.subdivisions,
        seed = config.planet.seed,
        "generating planet"
    );

    match SceneContext::from_config(&config).map_err(AppError::from) {
        Ok(scene) => {
            report(&scene.stats());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "scene generation failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_creates_file_and_applies_overrides() {
        let tmp = tempfile::tempdir().unwrap();
        let args = CliArgs::try_parse_from([
            "planetgen",
            "--config",
            tmp.path().to_str().unwrap(),
            "--subdivisions",
            "2",
        ])
        .unwrap();

        let (dirs, config) = load_config(&args).unwrap();

        assert!(dirs.config_dir.join("config.ron").exists());
        assert!(dirs.log_dir.exists());
        assert_eq!(config.planet.subdivisions, 2);
        // The file keeps the on-disk values; overrides are per run.
        let on_disk = Config::load_or_create(&dirs.config_dir).unwrap();
        assert_eq!(on_disk.planet.subdivisions, Config::default().planet.subdivisions);
    }

    #[test]
    fn test_load_config_rejects_invalid_override() {
        let tmp = tempfile::tempdir().unwrap();
        let args = CliArgs::try_parse_from([
            "planetgen",
            "--config",
            tmp.path().to_str().unwrap(),
            "--radius",
            "0",
        ])
        .unwrap();

        let result = load_config(&args);
        assert!(matches!(result, Err(AppError::Config(ConfigError::InvalidValue { .. }))));
    }

    #[test]
    fn test_scene_from_loaded_config() {
        let tmp = tempfile::tempdir().unwrap();
        let args = CliArgs::try_parse_from([
            "planetgen",
            "--config",
            tmp.path().to_str().unwrap(),
            "--subdivisions",
            "2",
            "--atmosphere-subdivisions",
            "1",
        ])
        .unwrap();

        let (_, config) = load_config(&args).unwrap();
        let stats = SceneContext::from_config(&config).unwrap().stats();
        assert_eq!(stats.planet_triangles, 320);
        assert_eq!(stats.atmosphere_vertices, 42);
    }
}
