//! Biome definition: the environmental ranges, priority, and display color of one biome.

/// An inclusive interval over a normalized field value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClimateRange {
    /// Lower bound (inclusive).
    pub min: f64,
    /// Upper bound (inclusive).
    pub max: f64,
}

impl ClimateRange {
    /// The whole normalized domain `[0.0, 1.0]`.
    pub const FULL: Self = Self { min: 0.0, max: 1.0 };

    /// Create a range. Bounds are not reordered; see [`ClimateRange::is_well_formed`].
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns `true` if `min <= value <= max`.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Inclusive interval overlap: either range contains an endpoint of the other.
    pub fn overlaps(&self, other: &ClimateRange) -> bool {
        self.contains(other.min)
            || self.contains(other.max)
            || other.contains(self.min)
            || other.contains(self.max)
    }

    /// Both bounds finite and `min <= max`.
    pub fn is_well_formed(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

/// Convert a `0xRRGGBB` color to normalized RGB.
pub const fn rgb_hex(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
    ]
}

/// Full descriptor for a biome rule.
#[derive(Clone, Debug, PartialEq)]
pub struct BiomeDef {
    /// Human-readable biome name (e.g., "temperate_forest").
    pub name: String,
    /// Temperatures this biome accepts.
    pub temperature: ClimateRange,
    /// Humidities this biome accepts.
    pub humidity: ClimateRange,
    /// Normalized terrain heights this biome accepts. `None` accepts any height.
    pub height: Option<ClimateRange>,
    /// Vertex color in normalized RGB.
    pub color: [f32; 3],
    /// Priority when several rules match; higher wins.
    pub weight: f64,
}

impl BiomeDef {
    /// Create a biome with no height restriction and weight `1.0`.
    pub fn new(
        name: impl Into<String>,
        temperature: ClimateRange,
        humidity: ClimateRange,
        color: [f32; 3],
    ) -> Self {
        Self {
            name: name.into(),
            temperature,
            humidity,
            height: None,
            color,
            weight: 1.0,
        }
    }

    /// Restrict the biome to a height band.
    pub fn with_height(mut self, height: ClimateRange) -> Self {
        self.height = Some(height);
        self
    }

    /// Set the tie-break weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Returns `true` if this rule accepts the sample.
    pub fn matches(&self, temperature: f64, humidity: f64, height: f64) -> bool {
        self.temperature.contains(temperature)
            && self.humidity.contains(humidity)
            && self.height.is_none_or(|band| band.contains(height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_inclusive() {
        let r = ClimateRange::new(0.2, 0.6);
        assert!(r.contains(0.2));
        assert!(r.contains(0.6));
        assert!(!r.contains(0.19));
        assert!(!r.contains(f64::NAN));
    }

    #[test]
    fn test_overlap_cases() {
        let a = ClimateRange::new(0.0, 0.5);
        assert!(a.overlaps(&ClimateRange::new(0.3, 0.8)));
        assert!(a.overlaps(&ClimateRange::new(0.5, 0.9)), "touching bounds overlap");
        assert!(a.overlaps(&ClimateRange::new(0.1, 0.2)), "containment overlaps");
        assert!(ClimateRange::new(0.1, 0.2).overlaps(&a));
        assert!(!a.overlaps(&ClimateRange::new(0.51, 1.0)));
    }

    #[test]
    fn test_height_band_excludes() {
        let def = BiomeDef::new("peak", ClimateRange::FULL, ClimateRange::FULL, [1.0; 3])
            .with_height(ClimateRange::new(0.8, 1.0));
        assert!(def.matches(0.5, 0.5, 0.9));
        assert!(!def.matches(0.5, 0.5, 0.3));
    }

    #[test]
    fn test_rgb_hex() {
        assert_eq!(rgb_hex(0xFF0000), [1.0, 0.0, 0.0]);
        assert_eq!(rgb_hex(0x00FF00), [0.0, 1.0, 0.0]);
        assert_eq!(rgb_hex(0x000000), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_well_formed() {
        assert!(ClimateRange::FULL.is_well_formed());
        assert!(!ClimateRange::new(0.6, 0.2).is_well_formed());
        assert!(!ClimateRange::new(f64::NAN, 1.0).is_well_formed());
    }
}
