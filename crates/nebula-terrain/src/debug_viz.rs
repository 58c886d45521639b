//! Terrain debug visualization: 2D images of scalar fields and biome maps.
//!
//! Provides [`DebugImage`] and renderers for heightmaps, climate fields, and
//! classified biome grids, used to eyeball generation issues outside the
//! renderer. Images can be written out as PNG.

mod image;
mod renderers;

pub use self::image::{DebugImage, DebugImageError};
pub use renderers::{render_biome_grid, render_scalar_grid, unit_to_byte};
