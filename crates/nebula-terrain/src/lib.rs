//! Procedural terrain generation: seeded fractal noise, rule-based biome
//! classification, and colored heightfield meshes.

mod async_generation;
mod climate;
mod error;
mod grid;
mod mesh;
mod noise_map;
mod seed;
mod value_noise;

pub mod biome;
pub mod debug_viz;

pub use async_generation::{AsyncTerrainBuilder, GeneratedTerrain, TerrainRequest};
pub use biome::{
    BiomeDef, BiomeId, BiomeRuleSet, BiomeRuleSetError, Classification, ClassifiedBiomeGrid,
    ClimateRange, OverlapWarning, classify, classify_biome, default_biomes,
};
pub use climate::{ClimateMaps, ClimateParams};
pub use error::ConfigurationError;
pub use grid::{FieldStats, Grid, ScalarGrid};
pub use mesh::{
    GenerationReport, MAX_SEGMENTS, TerrainMesh, TerrainMeshBuilder, TerrainParams, TerrainVertex,
    build_terrain_mesh,
};
pub use noise_map::{NoiseParams, generate_noise_map, generate_noise_map_with};
pub use seed::{
    ChaChaRng, DeterministicRng, FixedSeed, PERMUTATION_SIZE, PermutationTable, RandomSeed,
    SeedSource, SineRng,
};
pub use value_noise::ValueNoiseField;
