//! Renderers from terrain fields to [`DebugImage`]s.

use super::image::DebugImage;
use crate::biome::{BiomeRuleSet, ClassifiedBiomeGrid};
use crate::grid::ScalarGrid;

/// Convert a normalized channel value to a byte, clamping out-of-range input.
#[inline]
pub fn unit_to_byte(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Render a normalized scalar field as grayscale: 0 is black, 1 is white.
pub fn render_scalar_grid(grid: &ScalarGrid) -> DebugImage {
    let (w, h) = grid.dimensions();
    let mut image = DebugImage::new(w as u32, h as u32);
    for (y, row) in grid.rows().enumerate() {
        for (x, &v) in row.iter().enumerate() {
            let g = unit_to_byte(v);
            image.set_pixel(x as u32, y as u32, [g, g, g, 255]);
        }
    }
    image
}

/// Render a classified grid using each biome's color.
///
/// Passing a mesh's `biomes` gives a top-down map with one pixel per vertex.
pub fn render_biome_grid(grid: &ClassifiedBiomeGrid, rules: &BiomeRuleSet) -> DebugImage {
    let (w, h) = grid.dimensions();
    let mut image = DebugImage::new(w as u32, h as u32);
    for (y, row) in grid.rows().enumerate() {
        for (x, &id) in row.iter().enumerate() {
            let [r, g, b] = rules.get(id).color.map(|c| unit_to_byte(c as f64));
            image.set_pixel(x as u32, y as u32, [r, g, b, 255]);
        }
    }
    image
}
