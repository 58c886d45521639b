//! Ordered biome rule table with name lookup and overlap diagnostics.

use hashbrown::HashMap;

use super::BiomeDef;

/// Position of a biome in its [`BiomeRuleSet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BiomeId(pub u16);

impl BiomeId {
    /// Index into the rule sequence.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Errors that can occur when building a rule set.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BiomeRuleSetError {
    /// A rule set needs at least one biome to serve as the fallback.
    #[error("biome rule set is empty")]
    Empty,

    /// More rules than [`BiomeId`] can address.
    #[error("too many biome rules: {0}")]
    TooMany(usize),

    /// A biome with this name is already in the set.
    #[error("duplicate biome name: {0}")]
    DuplicateName(String),

    /// A range has non-finite bounds or `min > max`.
    #[error("biome `{biome}` has a malformed {field} range")]
    MalformedRange {
        /// Biome name.
        biome: String,
        /// Which range: "temperature", "humidity", or "height".
        field: &'static str,
    },

    /// The weight is NaN or infinite.
    #[error("biome `{biome}` has non-finite weight {weight}")]
    NonFiniteWeight {
        /// Biome name.
        biome: String,
        /// Offending weight.
        weight: f64,
    },
}

/// Two biomes whose temperature and humidity ranges both overlap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlapWarning {
    /// Earlier biome in sequence order.
    pub first: BiomeId,
    /// Later biome in sequence order.
    pub second: BiomeId,
    /// Name of `first`.
    pub first_name: String,
    /// Name of `second`.
    pub second_name: String,
}

/// An immutable, ordered sequence of biome rules.
///
/// Order matters: the first rule is the fallback when nothing matches and
/// breaks weight ties. The set is safe to share across threads.
#[derive(Clone, Debug)]
pub struct BiomeRuleSet {
    biomes: Vec<BiomeDef>,
    name_to_id: HashMap<String, BiomeId>,
}

impl BiomeRuleSet {
    /// Validate and freeze a rule table.
    ///
    /// # Errors
    ///
    /// Returns [`BiomeRuleSetError`] for an empty table, duplicate names,
    /// malformed ranges, or non-finite weights.
    pub fn new(biomes: Vec<BiomeDef>) -> Result<Self, BiomeRuleSetError> {
        if biomes.is_empty() {
            return Err(BiomeRuleSetError::Empty);
        }
        if biomes.len() > u16::MAX as usize {
            return Err(BiomeRuleSetError::TooMany(biomes.len()));
        }

        let mut name_to_id = HashMap::with_capacity(biomes.len());
        for (i, def) in biomes.iter().enumerate() {
            let ranges = [
                ("temperature", Some(def.temperature)),
                ("humidity", Some(def.humidity)),
                ("height", def.height),
            ];
            for (field, range) in ranges {
                if range.is_some_and(|r| !r.is_well_formed()) {
                    return Err(BiomeRuleSetError::MalformedRange {
                        biome: def.name.clone(),
                        field,
                    });
                }
            }
            if !def.weight.is_finite() {
                return Err(BiomeRuleSetError::NonFiniteWeight {
                    biome: def.name.clone(),
                    weight: def.weight,
                });
            }
            if name_to_id.insert(def.name.clone(), BiomeId(i as u16)).is_some() {
                return Err(BiomeRuleSetError::DuplicateName(def.name.clone()));
            }
        }

        Ok(Self { biomes, name_to_id })
    }

    /// Returns the definition for the given biome ID.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this set.
    pub fn get(&self, id: BiomeId) -> &BiomeDef {
        &self.biomes[id.index()]
    }

    /// Looks up a biome ID by name.
    pub fn lookup_by_name(&self, name: &str) -> Option<BiomeId> {
        self.name_to_id.get(name).copied()
    }

    /// The fallback biome: the first rule in sequence order.
    pub fn default_biome(&self) -> BiomeId {
        BiomeId(0)
    }

    /// Iterate `(id, definition)` pairs in sequence order.
    pub fn iter(&self) -> impl Iterator<Item = (BiomeId, &BiomeDef)> {
        self.biomes
            .iter()
            .enumerate()
            .map(|(i, def)| (BiomeId(i as u16), def))
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.biomes.len()
    }

    /// Always `false`; construction rejects empty tables.
    pub fn is_empty(&self) -> bool {
        self.biomes.is_empty()
    }

    /// Report every pair of biomes whose temperature and humidity ranges both
    /// overlap. Height ranges are not considered.
    pub fn check_consistency(&self) -> Vec<OverlapWarning> {
        let mut warnings = Vec::new();
        for (i, a) in self.biomes.iter().enumerate() {
            for (j, b) in self.biomes.iter().enumerate().skip(i + 1) {
                if a.temperature.overlaps(&b.temperature) && a.humidity.overlaps(&b.humidity) {
                    warnings.push(OverlapWarning {
                        first: BiomeId(i as u16),
                        second: BiomeId(j as u16),
                        first_name: a.name.clone(),
                        second_name: b.name.clone(),
                    });
                }
            }
        }
        warnings
    }

    /// Run [`Self::check_consistency`] and log each overlap. Generation is never blocked.
    pub fn log_consistency(&self) -> usize {
        let warnings = self.check_consistency();
        for w in &warnings {
            tracing::warn!(
                first = %w.first_name,
                second = %w.second_name,
                "biome climate ranges overlap; weight then order decides"
            );
        }
        warnings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::{ClimateRange, rgb_hex};

    fn biome(name: &str, t: (f64, f64), h: (f64, f64)) -> BiomeDef {
        BiomeDef::new(
            name,
            ClimateRange::new(t.0, t.1),
            ClimateRange::new(h.0, h.1),
            rgb_hex(0x808080),
        )
    }

    #[test]
    fn test_single_overlap_reported() {
        let set = BiomeRuleSet::new(vec![
            biome("a", (0.0, 0.5), (0.0, 1.0)),
            biome("b", (0.3, 0.8), (0.0, 1.0)),
        ])
        .unwrap();
        let warnings = set.check_consistency();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].first, BiomeId(0));
        assert_eq!(warnings[0].second, BiomeId(1));
        assert_eq!(warnings[0].first_name, "a");
    }

    #[test]
    fn test_disjoint_humidity_not_reported() {
        let set = BiomeRuleSet::new(vec![
            biome("dry", (0.0, 1.0), (0.0, 0.4)),
            biome("wet", (0.0, 1.0), (0.5, 1.0)),
        ])
        .unwrap();
        assert!(set.check_consistency().is_empty());
    }

    #[test]
    fn test_height_ranges_ignored_by_checker() {
        let set = BiomeRuleSet::new(vec![
            biome("low", (0.0, 1.0), (0.0, 1.0)).with_height(ClimateRange::new(0.0, 0.2)),
            biome("high", (0.0, 1.0), (0.0, 1.0)).with_height(ClimateRange::new(0.8, 1.0)),
        ])
        .unwrap();
        assert_eq!(set.check_consistency().len(), 1);
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(BiomeRuleSet::new(Vec::new()).unwrap_err(), BiomeRuleSetError::Empty);
    }

    #[test]
    fn test_duplicate_rejected() {
        let result = BiomeRuleSet::new(vec![
            biome("desert", (0.7, 1.0), (0.0, 0.3)),
            biome("desert", (0.0, 1.0), (0.0, 1.0)),
        ]);
        assert_eq!(
            result.unwrap_err(),
            BiomeRuleSetError::DuplicateName("desert".into())
        );
    }

    #[test]
    fn test_inverted_range_rejected() {
        let result = BiomeRuleSet::new(vec![biome("bad", (0.8, 0.2), (0.0, 1.0))]);
        assert!(matches!(
            result,
            Err(BiomeRuleSetError::MalformedRange {
                field: "temperature",
                ..
            })
        ));
    }

    #[test]
    fn test_non_finite_weight_rejected() {
        let result =
            BiomeRuleSet::new(vec![biome("nan", (0.0, 1.0), (0.0, 1.0)).with_weight(f64::NAN)]);
        assert!(matches!(result, Err(BiomeRuleSetError::NonFiniteWeight { .. })));
    }

    #[test]
    fn test_lookup_and_order() {
        let set = BiomeRuleSet::new(vec![
            biome("first", (0.0, 1.0), (0.0, 1.0)),
            biome("second", (0.0, 0.5), (0.0, 0.5)),
        ])
        .unwrap();
        assert_eq!(set.lookup_by_name("second"), Some(BiomeId(1)));
        assert_eq!(set.lookup_by_name("missing"), None);
        assert_eq!(set.default_biome(), BiomeId(0));
        assert_eq!(set.get(BiomeId(1)).name, "second");
        let names: Vec<_> = set.iter().map(|(_, d)| d.name.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[test]
    fn test_log_consistency_counts() {
        let set = BiomeRuleSet::new(vec![
            biome("a", (0.0, 0.5), (0.0, 1.0)),
            biome("b", (0.3, 0.8), (0.0, 1.0)),
            biome("c", (0.9, 1.0), (0.0, 1.0)),
        ])
        .unwrap();
        assert_eq!(set.log_consistency(), 1);
    }
}
