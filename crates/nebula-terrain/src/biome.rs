//! Biome system: rule table, overlap diagnostics, and weighted classification.
//!
//! Biomes are declared as temperature/humidity (and optionally height) ranges in
//! an ordered [`BiomeRuleSet`]. [`classify`] resolves every sample to exactly one
//! rule, falling back to the first rule when nothing matches.

mod classifier;
mod def;
mod defaults;
mod rule_set;

pub use classifier::{
    Classification, ClassifiedBiomeGrid, classify, classify_biome, classify_grid,
};
pub use def::{BiomeDef, ClimateRange, rgb_hex};
pub use defaults::{SEA_LEVEL, default_biome_defs, default_biomes};
pub use rule_set::{BiomeId, BiomeRuleSet, BiomeRuleSetError, OverlapWarning};
