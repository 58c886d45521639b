//! Resolves a (temperature, humidity, height) sample to exactly one biome.

use super::{BiomeDef, BiomeId, BiomeRuleSet};
use crate::grid::{Grid, ScalarGrid};

/// Outcome of classifying one sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    /// At least one rule matched; this is the highest-weight, earliest one.
    Matched(BiomeId),
    /// No rule matched; the set's first biome was substituted.
    Fallback(BiomeId),
}

impl Classification {
    /// The resolved biome, whichever path produced it.
    #[inline]
    pub fn id(self) -> BiomeId {
        match self {
            Self::Matched(id) | Self::Fallback(id) => id,
        }
    }

    /// Returns `true` if no rule matched.
    #[inline]
    pub fn is_fallback(self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// A grid of biome assignments. Cells hold IDs into a shared [`BiomeRuleSet`].
pub type ClassifiedBiomeGrid = Grid<BiomeId>;

/// Classify a sample against `rules`.
///
/// Rules whose temperature and humidity ranges contain the sample (inclusive)
/// survive, minus those whose height band excludes `height`. The highest
/// weight wins and ties go to the earliest rule. With no survivors the first
/// rule is returned as [`Classification::Fallback`].
pub fn classify(
    temperature: f64,
    humidity: f64,
    height: f64,
    rules: &BiomeRuleSet,
) -> Classification {
    let mut best: Option<(BiomeId, f64)> = None;
    for (id, def) in rules.iter() {
        if !def.matches(temperature, humidity, height) {
            continue;
        }
        // Strict `>` keeps the earliest rule on equal weight.
        if best.is_none_or(|(_, w)| def.weight > w) {
            best = Some((id, def.weight));
        }
    }

    match best {
        Some((id, _)) => Classification::Matched(id),
        None => Classification::Fallback(rules.default_biome()),
    }
}

/// Classify a sample and borrow the winning definition.
pub fn classify_biome<'a>(
    temperature: f64,
    humidity: f64,
    height: f64,
    rules: &'a BiomeRuleSet,
) -> &'a BiomeDef {
    rules.get(classify(temperature, humidity, height, rules).id())
}

/// Classify every cell of `height`, reading `(temperature, humidity)` for
/// cell `(x, y)` from `climate`.
///
/// The result has the same shape as `height`. Map it through
/// [`Classification::id`] for a [`ClassifiedBiomeGrid`].
pub fn classify_grid(
    height: &ScalarGrid,
    rules: &BiomeRuleSet,
    mut climate: impl FnMut(usize, usize) -> (f64, f64),
) -> Grid<Classification> {
    Grid::from_fn(height.width(), height.height(), |x, y| {
        let (t, m) = climate(x, y);
        classify(t, m, height[(x, y)], rules)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::{ClimateRange, default_biomes, rgb_hex};

    fn biome(name: &str, t: (f64, f64), h: (f64, f64), weight: f64) -> BiomeDef {
        BiomeDef::new(
            name,
            ClimateRange::new(t.0, t.1),
            ClimateRange::new(h.0, h.1),
            rgb_hex(0x336699),
        )
        .with_weight(weight)
    }

    #[test]
    fn test_weighted_tie_break() {
        let rules = BiomeRuleSet::new(vec![
            biome("light", (0.0, 1.0), (0.0, 1.0), 1.0),
            biome("heavy", (0.0, 1.0), (0.0, 1.0), 100.0),
        ])
        .unwrap();
        assert_eq!(classify_biome(0.5, 0.5, 0.5, &rules).name, "heavy");
    }

    #[test]
    fn test_equal_weight_prefers_earliest() {
        let rules = BiomeRuleSet::new(vec![
            biome("narrow", (0.0, 0.2), (0.0, 0.2), 1.0),
            biome("first", (0.0, 1.0), (0.0, 1.0), 2.0),
            biome("second", (0.0, 1.0), (0.0, 1.0), 2.0),
        ])
        .unwrap();
        assert_eq!(
            classify(0.5, 0.5, 0.5, &rules),
            Classification::Matched(BiomeId(1))
        );
    }

    #[test]
    fn test_fallback_is_first_rule() {
        let rules = BiomeRuleSet::new(vec![
            biome("cold", (0.0, 0.2), (0.0, 0.2), 1.0),
            biome("hot", (0.8, 1.0), (0.8, 1.0), 1.0),
        ])
        .unwrap();
        let result = classify(0.5, 0.5, 0.5, &rules);
        assert!(result.is_fallback());
        assert_eq!(result, Classification::Fallback(BiomeId(0)));
    }

    #[test]
    fn test_bounds_inclusive() {
        let rules = BiomeRuleSet::new(vec![
            biome("fallback", (0.9, 0.9), (0.9, 0.9), 1.0),
            biome("band", (0.2, 0.4), (0.2, 0.4), 1.0),
        ])
        .unwrap();
        assert_eq!(classify(0.2, 0.4, 0.0, &rules).id(), BiomeId(1));
        assert_eq!(classify(0.4, 0.2, 0.0, &rules).id(), BiomeId(1));
    }

    #[test]
    fn test_height_band_overrides_weight() {
        let rules = BiomeRuleSet::new(vec![
            biome("plain", (0.0, 1.0), (0.0, 1.0), 1.0),
            biome("peak", (0.0, 1.0), (0.0, 1.0), 50.0).with_height(ClimateRange::new(0.8, 1.0)),
        ])
        .unwrap();
        assert_eq!(classify_biome(0.5, 0.5, 0.9, &rules).name, "peak");
        assert_eq!(classify_biome(0.5, 0.5, 0.3, &rules).name, "plain");
    }

    #[test]
    fn test_default_table_is_total() {
        let rules = default_biomes();
        let steps = 20;
        for t in 0..=steps {
            for h in 0..=steps {
                for z in 0..=steps {
                    let (t, h, z) = (
                        t as f64 / steps as f64,
                        h as f64 / steps as f64,
                        z as f64 / steps as f64,
                    );
                    let result = classify(t, h, z, &rules);
                    assert!(!result.is_fallback(), "no match for ({t}, {h}, {z})");
                    assert!(result.id().index() < rules.len());
                }
            }
        }
    }

    #[test]
    fn test_classify_grid_shape() {
        let rules = default_biomes();
        let height = Grid::new(3, 2, 0.5);
        let grid = classify_grid(&height, &rules, |_, _| (0.5, 0.5));
        assert_eq!(grid.dimensions(), (3, 2));
        assert!(grid.iter().all(|c| !c.is_fallback()));
    }

    #[test]
    fn test_classify_grid_reads_climate_per_cell() {
        let rules = BiomeRuleSet::new(vec![
            biome("cold", (0.0, 0.5), (0.0, 1.0), 1.0),
            biome("hot", (0.5, 1.0), (0.0, 1.0), 2.0),
        ])
        .unwrap();
        let height = Grid::new(2, 1, 0.5);
        let ids: ClassifiedBiomeGrid =
            classify_grid(&height, &rules, |x, _| (x as f64 * 0.9, 0.5)).map(|c| c.id());
        assert_eq!(ids[(0, 0)], BiomeId(0));
        assert_eq!(ids[(1, 0)], BiomeId(1));
    }

    #[test]
    fn test_nan_sample_falls_back() {
        let rules = default_biomes();
        assert!(classify(f64::NAN, 0.5, 0.5, &rules).is_fallback());
    }
}
