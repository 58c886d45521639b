//! Terrain mesh construction: height displacement, biome coloring, and normals.
//!
//! [`TerrainMeshBuilder`] turns a seed and a [`TerrainParams`] into a
//! [`TerrainMesh`] by generating a fractal height field, two coarse climate
//! fields, classifying every vertex against a shared [`BiomeRuleSet`], and
//! recomputing normals from the displaced grid.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::biome::{BiomeRuleSet, ClassifiedBiomeGrid, classify_grid, default_biomes};
use crate::climate::{ClimateMaps, ClimateParams};
use crate::error::ConfigurationError;
use crate::grid::{FieldStats, Grid};
use crate::noise_map::{NoiseParams, generate_noise_map_with};
use crate::value_noise::ValueNoiseField;

/// Largest supported segment count; keeps vertex indices within `u32`.
pub const MAX_SEGMENTS: u32 = 16_384;

/// Everything needed to build one terrain mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainParams {
    /// Side length of the square terrain in world units.
    pub size: f64,
    /// Quads per side. The mesh has `(segments + 1)^2` vertices.
    pub segments: u32,
    /// World seed. Non-finite seeds generate the same terrain as `0.0`.
    pub seed: f64,
    /// Fractal parameters of the height field.
    pub noise: NoiseParams,
    /// Vertical displacement for a normalized height of `1.0`.
    pub amplitude: f64,
    /// Horizontal offset of the sampled noise window, in grid cells.
    pub offset_x: f64,
    /// Vertical offset of the sampled noise window, in grid cells.
    pub offset_y: f64,
    /// Added to every temperature sample before clamping. Ignored if non-finite.
    pub temperature_modifier: f64,
    /// Added to every humidity sample before clamping. Ignored if non-finite.
    pub humidity_modifier: f64,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            size: 200.0,
            segments: 128,
            seed: 0.0,
            noise: NoiseParams::default(),
            amplitude: 30.0,
            offset_x: 0.0,
            offset_y: 0.0,
            temperature_modifier: 0.0,
            humidity_modifier: 0.0,
        }
    }
}

impl TerrainParams {
    /// Check the geometry and noise parameters. Nothing is coerced.
    ///
    /// The seed and climate modifiers are not checked: a non-finite seed
    /// degrades to the seed-`0.0` table and a non-finite modifier is skipped.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigurationError`] found.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(self.size.is_finite() && self.size > 0.0) {
            return Err(ConfigurationError::InvalidSize(self.size));
        }
        if self.segments == 0 {
            return Err(ConfigurationError::InvalidSegments(self.segments));
        }
        if self.segments > MAX_SEGMENTS {
            return Err(ConfigurationError::TooManySegments {
                segments: self.segments,
                max: MAX_SEGMENTS,
            });
        }
        self.noise.validate()?;
        for (name, value) in [
            ("amplitude", self.amplitude),
            ("offset_x", self.offset_x),
            ("offset_y", self.offset_y),
        ] {
            if !value.is_finite() {
                return Err(ConfigurationError::NonFinite { name, value });
            }
        }
        Ok(())
    }

    /// Vertices per side.
    pub fn vertices_per_side(&self) -> usize {
        self.segments as usize + 1
    }
}

/// Interleaved vertex for GPU upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    /// World-space position.
    pub position: [f32; 3],
    /// Unit normal.
    pub normal: [f32; 3],
    /// Biome color in normalized RGB.
    pub color: [f32; 3],
}

/// Per-build diagnostics. Advisory only.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationReport {
    /// Mean of the temperature field after the modifier.
    pub average_temperature: f64,
    /// Mean of the humidity field after the modifier.
    pub average_humidity: f64,
    /// Statistics of the normalized height field.
    pub height: FieldStats,
    /// Vertices that no rule matched.
    pub fallback_vertices: usize,
    /// Vertex count per biome, indexed by [`BiomeId::index`](crate::biome::BiomeId::index).
    pub biome_counts: Vec<usize>,
}

/// A displaced, colored, normal-shaded terrain grid in row-major order.
#[derive(Clone, Debug)]
pub struct TerrainMesh {
    /// Side length in world units.
    pub size: f32,
    /// Quads per side.
    pub segments: u32,
    /// Vertex positions. X and Z span `[-size/2, size/2]`, Y is the displacement.
    pub positions: Vec<[f32; 3]>,
    /// Unit vertex normals matching the displaced geometry.
    pub normals: Vec<[f32; 3]>,
    /// Per-vertex biome color in normalized RGB.
    pub colors: Vec<[f32; 3]>,
    /// Per-vertex height offset (`normalized height * amplitude`).
    pub heights: Vec<f32>,
    /// Per-vertex biome assignment, `(segments + 1)` cells per side.
    pub biomes: ClassifiedBiomeGrid,
    /// Triangle list, two counter-clockwise (seen from +Y) triangles per quad.
    pub indices: Vec<u32>,
    /// Field statistics gathered while building.
    pub report: GenerationReport,
}

impl TerrainMesh {
    /// Number of vertices: `(segments + 1)^2`.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles: `2 * segments^2`.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Flat color buffer, three floats per vertex.
    pub fn color_buffer(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Flat position buffer, three floats per vertex.
    pub fn position_buffer(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Flat normal buffer, three floats per vertex.
    pub fn normal_buffer(&self) -> &[f32] {
        bytemuck::cast_slice(&self.normals)
    }

    /// Interleave positions, normals, and colors for a single vertex buffer.
    pub fn interleaved(&self) -> Vec<TerrainVertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .zip(&self.colors)
            .map(|((&position, &normal), &color)| TerrainVertex {
                position,
                normal,
                color,
            })
            .collect()
    }
}

/// Builds terrain meshes against a fixed biome rule set.
///
/// The builder holds only immutable state and can be shared across threads.
#[derive(Clone, Debug)]
pub struct TerrainMeshBuilder {
    rules: Arc<BiomeRuleSet>,
    climate: ClimateParams,
}

impl TerrainMeshBuilder {
    /// Create a builder. Overlapping rules are logged once here.
    pub fn new(rules: Arc<BiomeRuleSet>) -> Self {
        let overlaps = rules.log_consistency();
        tracing::debug!(biomes = rules.len(), overlaps, "terrain mesh builder ready");
        Self {
            rules,
            climate: ClimateParams::default(),
        }
    }

    /// Replace the climate field parameters.
    pub fn with_climate(mut self, climate: ClimateParams) -> Self {
        self.climate = climate;
        self
    }

    /// The rule set vertices are classified against.
    pub fn rules(&self) -> &Arc<BiomeRuleSet> {
        &self.rules
    }

    /// The climate field parameters.
    pub fn climate(&self) -> &ClimateParams {
        &self.climate
    }

    /// Generate the climate fields `build` would use for `params`.
    pub fn climate_maps(&self, params: &TerrainParams) -> ClimateMaps {
        let field = ValueNoiseField::new(params.seed);
        self.climate_maps_with(&field, params)
    }

    fn climate_maps_with(&self, field: &ValueNoiseField, params: &TerrainParams) -> ClimateMaps {
        ClimateMaps::generate(
            field,
            &self.climate,
            params.offset_x,
            params.offset_y,
            params.temperature_modifier,
            params.humidity_modifier,
        )
    }

    /// Build a mesh.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if `params` fails validation; no partial
    /// mesh is produced.
    pub fn build(&self, params: &TerrainParams) -> Result<TerrainMesh, ConfigurationError> {
        params.validate()?;

        let side = params.vertices_per_side();
        let segments = params.segments as usize;
        let field = ValueNoiseField::new(params.seed);

        let heightmap = generate_noise_map_with(
            &field,
            side,
            side,
            &params.noise,
            params.offset_x,
            params.offset_y,
        );
        let climate = self.climate_maps_with(&field, params);

        let classes = classify_grid(&heightmap, &self.rules, |x, z| {
            climate.sample_for_vertex(x, z, segments)
        });
        let fallback_vertices = classes.iter().filter(|c| c.is_fallback()).count();
        let biomes = classes.map(|c| c.id());

        let vertex_count = biomes.len();
        let size = params.size as f32;
        let half = size * 0.5;
        let step = size / segments as f32;
        let amplitude = params.amplitude as f32;

        let mut positions = Vec::with_capacity(vertex_count);
        let mut colors = Vec::with_capacity(vertex_count);
        let mut heights = Vec::with_capacity(vertex_count);
        let mut biome_counts = vec![0usize; self.rules.len()];

        // Row-major, z outer, matching `Grid` storage order.
        for (z, row) in biomes.rows().enumerate() {
            for (x, &id) in row.iter().enumerate() {
                let y = heightmap[(x, z)] as f32 * amplitude;
                positions.push([x as f32 * step - half, y, z as f32 * step - half]);
                heights.push(y);
                colors.push(self.rules.get(id).color);
                biome_counts[id.index()] += 1;
            }
        }

        let indices = grid_indices(&biomes);
        let normals = compute_normals(&positions, &indices);

        let report = GenerationReport {
            average_temperature: climate.temperature.stats().mean,
            average_humidity: climate.humidity.stats().mean,
            height: heightmap.stats(),
            fallback_vertices,
            biome_counts,
        };
        tracing::debug!(
            seed = params.seed,
            vertices = vertex_count,
            avg_temperature = report.average_temperature,
            avg_humidity = report.average_humidity,
            fallback = fallback_vertices,
            "terrain mesh built"
        );

        Ok(TerrainMesh {
            size,
            segments: params.segments,
            positions,
            normals,
            colors,
            heights,
            biomes,
            indices,
            report,
        })
    }
}

/// Build a mesh with the built-in biome table.
#[allow(clippy::too_many_arguments)]
pub fn build_terrain_mesh(
    size: f64,
    segments: u32,
    seed: f64,
    scale: f64,
    octaves: u32,
    persistence: f64,
    lacunarity: f64,
    amplitude: f64,
    offset_x: f64,
    offset_y: f64,
    temperature_modifier: f64,
    humidity_modifier: f64,
) -> Result<TerrainMesh, ConfigurationError> {
    let params = TerrainParams {
        size,
        segments,
        seed,
        noise: NoiseParams {
            scale,
            octaves,
            persistence,
            lacunarity,
        },
        amplitude,
        offset_x,
        offset_y,
        temperature_modifier,
        humidity_modifier,
    };
    TerrainMeshBuilder::new(Arc::new(default_biomes())).build(&params)
}

/// Triangle indices over the vertices of `grid`, two per quad.
fn grid_indices<T>(grid: &Grid<T>) -> Vec<u32> {
    let (w, h) = grid.dimensions();
    let (qw, qh) = (w.saturating_sub(1), h.saturating_sub(1));
    let vertex = |x, z| grid.index_of(x, z).map(|i| i as u32);

    let mut indices = Vec::with_capacity(qw * qh * 6);
    for z in 0..qh {
        for x in 0..qw {
            if let (Some(i0), Some(i1), Some(i2), Some(i3)) = (
                vertex(x, z),
                vertex(x + 1, z),
                vertex(x, z + 1),
                vertex(x + 1, z + 1),
            ) {
                indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
            }
        }
    }
    indices
}

/// Average the unit normals of every triangle touching each vertex.
fn compute_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut accum = vec![Vec3::ZERO; positions.len()];

    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize);
        let (va, vb, vc) = (
            Vec3::from(positions[a]),
            Vec3::from(positions[b]),
            Vec3::from(positions[c]),
        );
        let n = (vb - va).cross(vc - va).normalize_or_zero();
        accum[a] += n;
        accum[b] += n;
        accum[c] += n;
    }

    accum
        .into_iter()
        .map(|n| {
            let n = n.normalize_or_zero();
            let n = if n == Vec3::ZERO { Vec3::Y } else { n };
            n.to_array()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::{BiomeDef, ClimateRange, rgb_hex};

    fn params(segments: u32) -> TerrainParams {
        TerrainParams {
            size: 100.0,
            segments,
            seed: 42.0,
            noise: NoiseParams {
                scale: 0.1,
                octaves: 4,
                persistence: 0.5,
                lacunarity: 2.0,
            },
            amplitude: 20.0,
            ..Default::default()
        }
    }

    fn builder() -> TerrainMeshBuilder {
        TerrainMeshBuilder::new(Arc::new(default_biomes()))
    }

    #[test]
    fn test_mesh_shape_small() {
        let mesh = build_terrain_mesh(
            100.0, 4, 42.0, 0.1, 4, 0.5, 2.0, 20.0, 0.0, 0.0, 0.0, 0.0,
        )
        .unwrap();
        assert_eq!(mesh.vertex_count(), 25);
        assert_eq!(mesh.color_buffer().len(), 75);
        assert_eq!(mesh.normals.len(), 25);
        assert_eq!(mesh.heights.len(), 25);
        assert_eq!(mesh.triangle_count(), 32);
    }

    #[test]
    fn test_deterministic() {
        let b = builder();
        let a = b.build(&params(16)).unwrap();
        let c = b.build(&params(16)).unwrap();
        assert_eq!(a.positions, c.positions);
        assert_eq!(a.colors, c.colors);
        assert_eq!(a.normals, c.normals);
    }

    #[test]
    fn test_positions_span_size() {
        let mesh = builder().build(&params(8)).unwrap();
        let first = mesh.positions[0];
        let last = mesh.positions[mesh.vertex_count() - 1];
        assert_eq!((first[0], first[2]), (-50.0, -50.0));
        assert_eq!((last[0], last[2]), (50.0, 50.0));
        // Row-major: the second vertex steps along X.
        assert_eq!(mesh.positions[1][2], -50.0);
        assert!(mesh.positions[1][0] > -50.0);
    }

    #[test]
    fn test_heights_scaled_by_amplitude() {
        let mesh = builder().build(&params(8)).unwrap();
        for (p, &h) in mesh.positions.iter().zip(&mesh.heights) {
            assert_eq!(p[1], h);
            assert!((0.0..=20.0).contains(&h));
        }
    }

    #[test]
    fn test_colors_match_biomes() {
        let b = builder();
        let mesh = b.build(&params(8)).unwrap();
        for (color, &id) in mesh.colors.iter().zip(mesh.biomes.iter()) {
            assert_eq!(*color, b.rules().get(id).color);
        }
        assert_eq!(
            mesh.report.biome_counts.iter().sum::<usize>(),
            mesh.vertex_count()
        );
    }

    #[test]
    fn test_flat_terrain_normals_point_up() {
        let flat = TerrainParams {
            amplitude: 0.0,
            ..params(6)
        };
        let mesh = builder().build(&flat).unwrap();
        for n in &mesh.normals {
            assert!((n[1] - 1.0).abs() < 1e-6, "normal {n:?} not +Y");
        }
    }

    #[test]
    fn test_normals_are_unit_and_upward() {
        let mesh = builder().build(&params(12)).unwrap();
        for n in &mesh.normals {
            let len = Vec3::from(*n).length();
            assert!((len - 1.0).abs() < 1e-4);
            assert!(n[1] > 0.0, "heightfield normal {n:?} faces down");
        }
    }

    #[test]
    fn test_normals_follow_slope() {
        // A plane rising along +X tilts normals toward -X.
        let positions: Vec<[f32; 3]> = (0..3)
            .flat_map(|z| (0..3).map(move |x| [x as f32, x as f32, z as f32]))
            .collect();
        let normals = compute_normals(&positions, &grid_indices(&Grid::new(3, 3, ())));
        let expected = Vec3::new(-1.0, 1.0, 0.0).normalize();
        for n in normals {
            assert!((Vec3::from(n) - expected).length() < 1e-5);
        }
    }

    #[test]
    fn test_temperature_modifier_saturates_climate() {
        let hot = TerrainParams {
            temperature_modifier: 10.0,
            ..params(8)
        };
        let mesh = builder().build(&hot).unwrap();
        assert_eq!(mesh.report.average_temperature, 1.0);
    }

    #[test]
    fn test_rejects_non_positive_size() {
        for size in [0.0, -10.0, f64::NAN] {
            let bad = TerrainParams {
                size,
                ..params(4)
            };
            assert!(matches!(
                builder().build(&bad),
                Err(ConfigurationError::InvalidSize(_))
            ));
        }
    }

    #[test]
    fn test_rejects_zero_segments() {
        assert_eq!(
            builder().build(&params(0)).unwrap_err(),
            ConfigurationError::InvalidSegments(0)
        );
    }

    #[test]
    fn test_rejects_too_many_segments() {
        assert!(matches!(
            params(MAX_SEGMENTS + 1).validate(),
            Err(ConfigurationError::TooManySegments { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_octaves() {
        let mut bad = params(4);
        bad.noise.octaves = 0;
        assert_eq!(
            builder().build(&bad).unwrap_err(),
            ConfigurationError::InvalidOctaves(0)
        );
    }

    #[test]
    fn test_non_finite_modifier_ignored() {
        let b = builder();
        let plain = b.build(&params(4)).unwrap();
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let odd = TerrainParams {
                temperature_modifier: value,
                humidity_modifier: value,
                ..params(4)
            };
            let mesh = b.build(&odd).unwrap();
            assert_eq!(mesh.colors, plain.colors);
            assert_eq!(mesh.report, plain.report);
        }
    }

    #[test]
    fn test_non_finite_seed_matches_seed_zero() {
        let b = builder();
        let zero = b
            .build(&TerrainParams {
                seed: 0.0,
                ..params(6)
            })
            .unwrap();
        for seed in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mesh = b
                .build(&TerrainParams {
                    seed,
                    ..params(6)
                })
                .unwrap();
            assert_eq!(mesh.positions, zero.positions);
            assert_eq!(mesh.colors, zero.colors);
            assert_eq!(mesh.biomes, zero.biomes);
        }
    }

    #[test]
    fn test_flat_entry_point_accepts_nan_seed() {
        let mesh = build_terrain_mesh(
            100.0,
            4,
            f64::NAN,
            0.1,
            4,
            0.5,
            2.0,
            20.0,
            0.0,
            0.0,
            0.0,
            0.0,
        )
        .unwrap();
        assert_eq!(mesh.vertex_count(), 25);
    }

    #[test]
    fn test_biomes_form_vertex_grid() {
        let mesh = builder().build(&params(5)).unwrap();
        assert_eq!(mesh.biomes.dimensions(), (6, 6));
        let i = mesh.biomes.index_of(2, 3).unwrap();
        assert_eq!(mesh.colors[i], builder().rules().get(mesh.biomes[(2, 3)]).color);
    }

    #[test]
    fn test_indices_follow_grid_layout() {
        let indices = grid_indices(&Grid::new(3, 2, 0u8));
        assert_eq!(indices, [0, 3, 1, 1, 3, 4, 1, 4, 2, 2, 4, 5]);
    }

    #[test]
    fn test_fallback_counted() {
        let rules = BiomeRuleSet::new(vec![
            BiomeDef::new(
                "never",
                ClimateRange::new(2.0, 3.0),
                ClimateRange::new(2.0, 3.0),
                rgb_hex(0xFF00FF),
            ),
        ])
        .unwrap();
        let mesh = TerrainMeshBuilder::new(Arc::new(rules))
            .build(&params(4))
            .unwrap();
        assert_eq!(mesh.report.fallback_vertices, 25);
        assert!(mesh.colors.iter().all(|c| *c == rgb_hex(0xFF00FF)));
    }

    #[test]
    fn test_interleaved_matches_buffers() {
        let mesh = builder().build(&params(3)).unwrap();
        let verts = mesh.interleaved();
        assert_eq!(verts.len(), 16);
        assert_eq!(verts[5].position, mesh.positions[5]);
        assert_eq!(verts[5].normal, mesh.normals[5]);
        assert_eq!(verts[5].color, mesh.colors[5]);
        assert_eq!(bytemuck::cast_slice::<_, u8>(verts.as_slice()).len(), 16 * 36);
    }

    #[test]
    fn test_offset_changes_terrain() {
        let moved = TerrainParams {
            offset_x: 37.0,
            ..params(8)
        };
        let a = builder().build(&params(8)).unwrap();
        let b = builder().build(&moved).unwrap();
        assert_ne!(a.heights, b.heights);
    }
}
