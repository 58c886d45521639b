//! Command-line argument parsing for the terrain generator.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Terrain generator command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "nebula-terrain", about = "Procedural biome terrain generator")]
pub struct CliArgs {
    /// World seed (omit for a random seed).
    #[arg(long)]
    pub seed: Option<f64>,

    /// Terrain side length in world units.
    #[arg(long)]
    pub size: Option<f64>,

    /// Quads per side.
    #[arg(long)]
    pub segments: Option<u32>,

    /// Base noise frequency.
    #[arg(long)]
    pub scale: Option<f64>,

    /// Number of noise octaves.
    #[arg(long)]
    pub octaves: Option<u32>,

    /// Amplitude decay per octave.
    #[arg(long)]
    pub persistence: Option<f64>,

    /// Frequency growth per octave.
    #[arg(long)]
    pub lacunarity: Option<f64>,

    /// Vertical displacement scale.
    #[arg(long)]
    pub amplitude: Option<f64>,

    /// Noise window offset along X.
    #[arg(long, allow_hyphen_values = true)]
    pub offset_x: Option<f64>,

    /// Noise window offset along Y.
    #[arg(long, allow_hyphen_values = true)]
    pub offset_y: Option<f64>,

    /// Temperature bias (e.g. 0.2 hotter, -0.2 colder).
    #[arg(long, allow_hyphen_values = true)]
    pub temperature_modifier: Option<f64>,

    /// Humidity bias (e.g. 0.2 wetter, -0.2 drier).
    #[arg(long, allow_hyphen_values = true)]
    pub humidity_modifier: Option<f64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Write debug PNGs (height, temperature, humidity, biomes) to this directory.
    #[arg(long)]
    pub dump_images: Option<PathBuf>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.terrain.seed = Some(seed);
        }
        if let Some(size) = args.size {
            self.terrain.size = size;
        }
        if let Some(segments) = args.segments {
            self.terrain.segments = segments;
        }
        if let Some(amplitude) = args.amplitude {
            self.terrain.amplitude = amplitude;
        }
        if let Some(x) = args.offset_x {
            self.terrain.offset_x = x;
        }
        if let Some(y) = args.offset_y {
            self.terrain.offset_y = y;
        }
        if let Some(t) = args.temperature_modifier {
            self.terrain.temperature_modifier = t;
        }
        if let Some(h) = args.humidity_modifier {
            self.terrain.humidity_modifier = h;
        }
        if let Some(scale) = args.scale {
            self.noise.scale = scale;
        }
        if let Some(octaves) = args.octaves {
            self.noise.octaves = octaves;
        }
        if let Some(p) = args.persistence {
            self.noise.persistence = p;
        }
        if let Some(l) = args.lacunarity {
            self.noise.lacunarity = l;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(ref dir) = args.dump_images {
            self.debug.dump_images = Some(dir.display().to_string());
        }
    }
}
