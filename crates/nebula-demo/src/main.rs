//! Demo binary that generates one biome-colored terrain mesh and reports on it.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p nebula-demo` for a random seed.
//! Run with `cargo run -p nebula-demo -- --seed 42 --segments 64 --dump-images out`
//! to reproduce a run and write debug PNGs.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use nebula_config::{CliArgs, ClimateConfig, Config, default_config_dir};
use nebula_terrain::debug_viz::{render_biome_grid, render_scalar_grid};
use nebula_terrain::{
    ClimateParams, FixedSeed, NoiseParams, RandomSeed, SeedSource, TerrainMesh,
    TerrainMeshBuilder, TerrainParams, default_biomes, generate_noise_map,
};
use tracing::{error, info, warn};

/// Map the config file's terrain and noise sections onto build parameters.
fn terrain_params(config: &Config, seed: f64) -> TerrainParams {
    TerrainParams {
        size: config.terrain.size,
        segments: config.terrain.segments,
        seed,
        noise: NoiseParams {
            scale: config.noise.scale,
            octaves: config.noise.octaves,
            persistence: config.noise.persistence,
            lacunarity: config.noise.lacunarity,
        },
        amplitude: config.terrain.amplitude,
        offset_x: config.terrain.offset_x,
        offset_y: config.terrain.offset_y,
        temperature_modifier: config.terrain.temperature_modifier,
        humidity_modifier: config.terrain.humidity_modifier,
    }
}

/// Map the climate section onto climate field parameters.
fn climate_params(climate: &ClimateConfig) -> ClimateParams {
    let defaults = ClimateParams::default();
    ClimateParams {
        temperature: NoiseParams {
            scale: climate.temperature_scale,
            octaves: climate.octaves,
            ..defaults.temperature
        },
        humidity: NoiseParams {
            scale: climate.humidity_scale,
            octaves: climate.octaves,
            ..defaults.humidity
        },
        resolution: climate.resolution,
        ..defaults
    }
}

fn seed_source(config: &Config) -> Box<dyn SeedSource> {
    match config.terrain.seed {
        Some(seed) => Box::new(FixedSeed(seed)),
        None => Box::new(RandomSeed),
    }
}

fn report(mesh: &TerrainMesh, builder: &TerrainMeshBuilder) {
    let r = &mesh.report;
    info!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        colors = mesh.color_buffer().len(),
        "Terrain mesh generated"
    );
    info!(
        "Average temperature {:.3}, average humidity {:.3}",
        r.average_temperature, r.average_humidity
    );
    info!(
        "Height min {:.3} / mean {:.3} / max {:.3}",
        r.height.min, r.height.mean, r.height.max
    );
    if r.fallback_vertices > 0 {
        warn!(
            fallback = r.fallback_vertices,
            "Some vertices matched no biome rule"
        );
    }

    let rules = builder.rules();
    let mut counts: Vec<_> = rules
        .iter()
        .map(|(id, def)| (def.name.as_str(), r.biome_counts[id.index()]))
        .filter(|&(_, n)| n > 0)
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    for (name, n) in counts {
        let share = n as f64 / mesh.vertex_count() as f64 * 100.0;
        info!("  {name:<12} {n:>8} vertices ({share:5.1}%)");
    }
}

fn dump_images(
    dir: &Path,
    params: &TerrainParams,
    builder: &TerrainMeshBuilder,
    mesh: &TerrainMesh,
) {
    if let Err(e) = std::fs::create_dir_all(dir) {
        error!("Failed to create image directory {}: {e}", dir.display());
        return;
    }

    let side = params.vertices_per_side();
    let height = generate_noise_map(
        side,
        side,
        params.seed,
        &params.noise,
        params.offset_x,
        params.offset_y,
    );
    let climate = builder.climate_maps(params);

    let images = [
        ("height.png", render_scalar_grid(&height)),
        ("temperature.png", render_scalar_grid(&climate.temperature)),
        ("humidity.png", render_scalar_grid(&climate.humidity)),
        ("biomes.png", render_biome_grid(&mesh.biomes, builder.rules())),
    ];
    for (name, image) in images {
        let path = dir.join(name);
        match image.write_png(&path) {
            Ok(()) => info!("Wrote {}", path.display()),
            Err(e) => error!("Failed to write {}: {e}", path.display()),
        }
    }
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = match args.config.clone().map_or_else(default_config_dir, Ok) {
        Ok(dir) => Some(dir),
        Err(e) => {
            eprintln!("{e}, using defaults");
            None
        }
    };

    // Load or create config, then apply CLI overrides
    let mut config = config_dir
        .as_deref()
        .map(|dir| {
            Config::load_or_create(dir).unwrap_or_else(|e| {
                eprintln!("Failed to load config: {e}, using defaults");
                Config::default()
            })
        })
        .unwrap_or_default();
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.as_ref().map(|dir| dir.join("logs"));
    nebula_log::init_logging(log_dir.as_deref(), cfg!(debug_assertions), Some(&config));

    let seed = seed_source(&config).draw_seed();
    info!("Generating terrain with seed {seed}");

    let params = terrain_params(&config, seed);
    let builder = TerrainMeshBuilder::new(Arc::new(default_biomes()))
        .with_climate(climate_params(&config.climate));

    let start = std::time::Instant::now();
    let mesh = match builder.build(&params) {
        Ok(mesh) => mesh,
        Err(e) => {
            error!("Invalid terrain configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!("Built in {:.2} ms", start.elapsed().as_secs_f64() * 1000.0);

    report(&mesh, &builder);

    if let Some(dir) = &config.debug.dump_images {
        dump_images(Path::new(dir), &params, &builder, &mesh);
    }

    ExitCode::SUCCESS
}
