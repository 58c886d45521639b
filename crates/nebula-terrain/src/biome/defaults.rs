//! Built-in biome table.

use super::{BiomeDef, BiomeRuleSet, ClimateRange, rgb_hex};

/// Normalized height below which terrain is treated as sea floor.
pub const SEA_LEVEL: f64 = 0.35;

/// The built-in biome definitions in priority order.
///
/// `plains` comes first and spans the whole climate domain with the lowest
/// weight, so it is both the fallback and a catch-all.
pub fn default_biome_defs() -> Vec<BiomeDef> {
    let full = ClimateRange::FULL;
    vec![
        BiomeDef::new("plains", full, full, rgb_hex(0x7CB342)).with_weight(0.1),
        BiomeDef::new("ocean", full, full, rgb_hex(0x1E5AA8))
            .with_height(ClimateRange::new(0.0, SEA_LEVEL))
            .with_weight(100.0),
        BiomeDef::new("beach", ClimateRange::new(0.3, 1.0), full, rgb_hex(0xE3D59B))
            .with_height(ClimateRange::new(SEA_LEVEL, 0.4))
            .with_weight(50.0),
        BiomeDef::new(
            "desert",
            ClimateRange::new(0.65, 1.0),
            ClimateRange::new(0.0, 0.3),
            rgb_hex(0xE0C068),
        )
        .with_weight(5.0),
        BiomeDef::new(
            "savanna",
            ClimateRange::new(0.6, 1.0),
            ClimateRange::new(0.25, 0.5),
            rgb_hex(0xB5A642),
        )
        .with_weight(4.0),
        BiomeDef::new(
            "forest",
            ClimateRange::new(0.35, 0.7),
            ClimateRange::new(0.45, 0.8),
            rgb_hex(0x2E7D32),
        )
        .with_weight(3.0),
        BiomeDef::new(
            "rainforest",
            ClimateRange::new(0.65, 1.0),
            ClimateRange::new(0.65, 1.0),
            rgb_hex(0x14591E),
        )
        .with_weight(5.0),
        BiomeDef::new(
            "taiga",
            ClimateRange::new(0.15, 0.4),
            ClimateRange::new(0.4, 1.0),
            rgb_hex(0x2F5D50),
        )
        .with_weight(3.0),
        BiomeDef::new("tundra", ClimateRange::new(0.0, 0.2), full, rgb_hex(0xC8D2DC))
            .with_weight(4.0),
        BiomeDef::new("snow_peaks", full, full, rgb_hex(0xF5F7FA))
            .with_height(ClimateRange::new(0.75, 1.0))
            .with_weight(200.0),
    ]
}

/// The built-in biome table as a validated rule set.
pub fn default_biomes() -> BiomeRuleSet {
    BiomeRuleSet::new(default_biome_defs()).expect("built-in biome table is valid")
}
