//! Multi-octave fractal accumulation of 2D noise into a normalized [`ScalarGrid`].

use noise::NoiseFn;

use crate::error::ConfigurationError;
use crate::grid::{Grid, ScalarGrid};
use crate::value_noise::ValueNoiseField;

/// Fractal parameters shared by the height and climate fields.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseParams {
    /// Base sampling frequency applied to grid coordinates. `0.0` samples a
    /// constant field.
    pub scale: f64,
    /// Number of octaves to sum. Clamped to at least 1 by [`generate_noise_map`].
    pub octaves: u32,
    /// Amplitude multiplier between successive octaves.
    pub persistence: f64,
    /// Frequency multiplier between successive octaves.
    pub lacunarity: f64,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            scale: 0.05,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

impl NoiseParams {
    /// Strict validation used by the mesh builder, which does not clamp.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidOctaves`] for zero octaves and
    /// [`ConfigurationError::NonFinite`] for NaN or infinite parameters.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.octaves < 1 {
            return Err(ConfigurationError::InvalidOctaves(self.octaves));
        }
        for (name, value) in [
            ("scale", self.scale),
            ("persistence", self.persistence),
            ("lacunarity", self.lacunarity),
        ] {
            if !value.is_finite() {
                return Err(ConfigurationError::NonFinite { name, value });
            }
        }
        Ok(())
    }
}

/// Generate a `width x height` fractal noise grid for `seed`.
///
/// Every cell sums `octaves` samples of a [`ValueNoiseField`] at
/// `(x + offset_x) * scale * frequency`, then maps the sum from `[-1, 1]` to
/// `[0, 1]`. Identical arguments always produce identical grids.
pub fn generate_noise_map(
    width: usize,
    height: usize,
    seed: f64,
    params: &NoiseParams,
    offset_x: f64,
    offset_y: f64,
) -> ScalarGrid {
    let field = ValueNoiseField::new(seed);
    generate_noise_map_with(&field, width, height, params, offset_x, offset_y)
}

/// Like [`generate_noise_map`], over any 2D noise source.
pub fn generate_noise_map_with(
    source: &impl NoiseFn<f64, 2>,
    width: usize,
    height: usize,
    params: &NoiseParams,
    offset_x: f64,
    offset_y: f64,
) -> ScalarGrid {
    let octaves = params.octaves.max(1);

    Grid::from_fn(width, height, |x, y| {
        let mut sum = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;

        for _ in 0..octaves {
            let sx = (x as f64 + offset_x) * params.scale * frequency;
            let sy = (y as f64 + offset_y) * params.scale * frequency;
            sum += amplitude * source.get([sx, sy]);

            amplitude *= params.persistence;
            frequency *= params.lacunarity;
        }

        normalize(sum)
    })
}

/// Map a fractal sum from `[-1, 1]` to `[0, 1]`, clamping overshoot.
#[inline]
fn normalize(sum: f64) -> f64 {
    let v = (sum + 1.0) * 0.5;
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.5 }
}
