//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level terrain generator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Mesh geometry and climate bias.
    pub terrain: TerrainConfig,
    /// Height field fractal noise.
    pub noise: NoiseConfig,
    /// Temperature and humidity field noise.
    pub climate: ClimateConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Terrain mesh configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// Side length of the terrain in world units.
    pub size: f64,
    /// Quads per side.
    pub segments: u32,
    /// Fixed world seed. `None` draws a fresh seed each run.
    pub seed: Option<f64>,
    /// Vertical displacement for a normalized height of 1.0.
    pub amplitude: f64,
    /// Noise window offset along X, in grid cells.
    pub offset_x: f64,
    /// Noise window offset along Y, in grid cells.
    pub offset_y: f64,
    /// Bias added to every temperature sample (clamped to [0, 1]).
    pub temperature_modifier: f64,
    /// Bias added to every humidity sample (clamped to [0, 1]).
    pub humidity_modifier: f64,
}

/// Fractal noise configuration for the height field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NoiseConfig {
    /// Base sampling frequency.
    pub scale: f64,
    /// Number of octaves.
    pub octaves: u32,
    /// Amplitude decay per octave.
    pub persistence: f64,
    /// Frequency growth per octave.
    pub lacunarity: f64,
}

/// Climate field configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClimateConfig {
    /// Base frequency of the temperature field.
    pub temperature_scale: f64,
    /// Base frequency of the humidity field.
    pub humidity_scale: f64,
    /// Octaves for both climate fields.
    pub octaves: u32,
    /// Cells per side of each climate grid (`0` behaves as `1`).
    pub resolution: usize,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Directory to write heightmap/climate/biome PNGs to. `None` disables.
    pub dump_images: Option<String>,
}

// --- Default implementations ---

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            size: 200.0,
            segments: 128,
            seed: None,
            amplitude: 30.0,
            offset_x: 0.0,
            offset_y: 0.0,
            temperature_modifier: 0.0,
            humidity_modifier: 0.0,
        }
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            scale: 0.05,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

impl Default for ClimateConfig {
    fn default() -> Self {
        Self {
            temperature_scale: 0.008,
            humidity_scale: 0.012,
            octaves: 2,
            resolution: 256,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            dump_images: None,
        }
    }
}

// --- Load / Save / Reload ---

/// The per-user config directory, e.g. `~/.config/nebula-terrain` on Linux.
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("nebula-terrain"))
        .ok_or(ConfigError::NoConfigDir)
}

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

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

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
