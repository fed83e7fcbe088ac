//! Command-line argument parsing for the planet generator.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Planet generator command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "planetgen", about = "Procedural planet and atmosphere mesh generator")]
pub struct CliArgs {
    /// Base radius of the planet surface.
    #[arg(long)]
    pub radius: Option<f32>,

    /// Icosphere subdivision level of the planet surface.
    #[arg(long)]
    pub subdivisions: Option<u32>,

    /// Icosphere subdivision level of the atmosphere shell.
    #[arg(long)]
    pub atmosphere_subdivisions: Option<u32>,

    /// Atmosphere radius as a multiple of the planet radius.
    #[arg(long)]
    pub atmosphere_ratio: Option<f32>,

    /// Terrain noise seed.
    #[arg(long)]
    pub seed: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(r) = args.radius {
            self.planet.base_radius = r;
        }
        if let Some(s) = args.subdivisions {
            self.planet.subdivisions = s;
        }
        if let Some(s) = args.atmosphere_subdivisions {
            self.atmosphere.subdivisions = s;
        }
        if let Some(ratio) = args.atmosphere_ratio {
            self.atmosphere.planet_ratio = ratio;
        }
        if let Some(seed) = args.seed {
            self.planet.seed = seed;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
