//! Temperature and humidity fields used for biome classification.
//!
//! Climate varies far more slowly than elevation, so both fields are sampled on
//! a fixed, coarse grid with few octaves and looked up by nearest cell.

use noise::NoiseFn;

use crate::grid::ScalarGrid;
use crate::noise_map::{NoiseParams, generate_noise_map_with};

/// Parameters for the two climate fields.
#[derive(Clone, Debug, PartialEq)]
pub struct ClimateParams {
    /// Fractal parameters of the temperature field.
    pub temperature: NoiseParams,
    /// Fractal parameters of the humidity field.
    pub humidity: NoiseParams,
    /// Extra lattice offset applied to humidity so it decorrelates from
    /// temperature when both share a seed.
    pub humidity_offset: f64,
    /// Cells per side of each climate grid. `0` is treated as `1`, which
    /// gives a single climate cell for the whole mesh.
    pub resolution: usize,
}

impl Default for ClimateParams {
    fn default() -> Self {
        Self {
            temperature: NoiseParams {
                scale: 0.008,
                octaves: 2,
                persistence: 0.5,
                lacunarity: 2.0,
            },
            humidity: NoiseParams {
                scale: 0.012,
                octaves: 2,
                persistence: 0.5,
                lacunarity: 2.0,
            },
            humidity_offset: 512.0,
            resolution: 256,
        }
    }
}

/// A pair of normalized climate fields.
#[derive(Clone, Debug, PartialEq)]
pub struct ClimateMaps {
    /// Temperature in `[0, 1]`, after the modifier.
    pub temperature: ScalarGrid,
    /// Humidity in `[0, 1]`, after the modifier.
    pub humidity: ScalarGrid,
}

impl ClimateMaps {
    /// Sample both fields from `field` and bias them by the modifiers.
    ///
    /// Modifiers are added to every sample and the result clamped to `[0, 1]`,
    /// which makes a run hotter/colder or wetter/drier without a new seed.
    pub fn generate(
        field: &impl NoiseFn<f64, 2>,
        params: &ClimateParams,
        offset_x: f64,
        offset_y: f64,
        temperature_modifier: f64,
        humidity_modifier: f64,
    ) -> Self {
        let res = params.resolution.max(1);

        let mut temperature =
            generate_noise_map_with(field, res, res, &params.temperature, offset_x, offset_y);
        temperature.apply_modifier(temperature_modifier);

        let mut humidity = generate_noise_map_with(
            field,
            res,
            res,
            &params.humidity,
            offset_x + params.humidity_offset,
            offset_y + params.humidity_offset,
        );
        humidity.apply_modifier(humidity_modifier);

        Self {
            temperature,
            humidity,
        }
    }

    /// Cells per side.
    pub fn resolution(&self) -> usize {
        self.temperature.width()
    }

    /// Nearest climate cell for mesh coordinate `coord` in `0..=segments`:
    /// `floor(coord * (resolution - 1) / segments)`.
    pub fn cell_for(&self, coord: usize, segments: usize) -> usize {
        let last = self.resolution().saturating_sub(1);
        if segments == 0 {
            return 0;
        }
        ((coord * last) / segments).min(last)
    }

    /// `(temperature, humidity)` at mesh vertex `(x, z)` of a `segments`-wide mesh.
    pub fn sample_for_vertex(&self, x: usize, z: usize, segments: usize) -> (f64, f64) {
        let cx = self.cell_for(x, segments);
        let cz = self.cell_for(z, segments);
        (self.temperature[(cx, cz)], self.humidity[(cx, cz)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_noise::ValueNoiseField;

    #[test]
    fn test_default_resolution() {
        let field = ValueNoiseField::new(42.0);
        let maps = ClimateMaps::generate(&field, &ClimateParams::default(), 0.0, 0.0, 0.0, 0.0);
        assert_eq!(maps.temperature.dimensions(), (256, 256));
        assert_eq!(maps.humidity.dimensions(), (256, 256));
    }

    #[test]
    fn test_temperature_modifier_saturates() {
        let field = ValueNoiseField::new(42.0);
        let maps = ClimateMaps::generate(&field, &ClimateParams::default(), 0.0, 0.0, 10.0, 0.0);
        assert!(maps.temperature.iter().all(|&t| t == 1.0));
        assert!(maps.humidity.iter().all(|h| (0.0..=1.0).contains(h)));
    }

    #[test]
    fn test_humidity_modifier_floors() {
        let field = ValueNoiseField::new(3.0);
        let maps = ClimateMaps::generate(&field, &ClimateParams::default(), 0.0, 0.0, 0.0, -10.0);
        assert!(maps.humidity.iter().all(|&h| h == 0.0));
    }

    #[test]
    fn test_fields_are_decorrelated() {
        let field = ValueNoiseField::new(11.0);
        let maps = ClimateMaps::generate(&field, &ClimateParams::default(), 0.0, 0.0, 0.0, 0.0);
        assert_ne!(maps.temperature, maps.humidity);
    }

    #[test]
    fn test_zero_resolution_is_single_cell() {
        let field = ValueNoiseField::new(1.0);
        let params = ClimateParams {
            resolution: 0,
            ..Default::default()
        };
        let maps = ClimateMaps::generate(&field, &params, 0.0, 0.0, 0.0, 0.0);
        assert_eq!(maps.resolution(), 1);
        assert_eq!(maps.cell_for(7, 8), 0);
        let (t, h) = maps.sample_for_vertex(8, 8, 8);
        assert_eq!((t, h), (maps.temperature[(0, 0)], maps.humidity[(0, 0)]));
    }

    #[test]
    fn test_cell_mapping_spans_grid() {
        let field = ValueNoiseField::new(1.0);
        let maps = ClimateMaps::generate(&field, &ClimateParams::default(), 0.0, 0.0, 0.0, 0.0);
        assert_eq!(maps.cell_for(0, 4), 0);
        assert_eq!(maps.cell_for(1, 4), 63);
        assert_eq!(maps.cell_for(2, 4), 127);
        assert_eq!(maps.cell_for(4, 4), 255);
        assert_eq!(maps.cell_for(0, 0), 0);
    }
}
