//! Map configuration: grid dimensions, geometric constants and noise parameters.

use bevy::prelude::*;

/// Nested configuration for the hex map.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct MapConfig {
    /// Grid dimensions, default color and hash seed.
    pub grid: GridSettings,
    /// Geometric constants used by the triangulator.
    pub metrics: MetricsSettings,
    /// Parameters of the generated perturbation noise texture.
    pub noise: NoiseSettings,
}

/// Grid layout in tiles of cells.
#[derive(Clone, Debug, Reflect)]
pub struct GridSettings {
    /// Number of tiles along X.
    pub chunk_count_x: u32,
    /// Number of tiles along Z.
    pub chunk_count_z: u32,
    /// Cells per tile along X.
    pub chunk_size_x: u32,
    /// Cells per tile along Z.
    pub chunk_size_z: u32,
    /// Color every cell starts with.
    pub default_color: LinearRgba,
    /// Seed of the per-grid hash table.
    pub hash_seed: u64,
}

/// Geometric constants of a single hex cell and its surroundings.
#[derive(Clone, Debug, Reflect)]
pub struct MetricsSettings {
    /// Center-to-corner distance.
    pub outer_radius: f32,
    /// Fraction of the hex that belongs to the cell alone; the rest blends.
    pub solid_factor: f32,
    /// World height of one elevation level.
    pub elevation_step: f32,
    /// Flat ledges per one-level slope.
    pub terraces_per_slope: u32,
    /// Maximum horizontal vertex displacement.
    pub cell_perturb_strength: f32,
    /// Maximum vertical displacement of cell centers.
    pub elevation_perturb_strength: f32,
    /// World-to-noise-texture coordinate scale.
    pub noise_scale: f32,
    /// Stream bed depth in elevation levels (negative is down).
    pub stream_bed_elevation_offset: f32,
    /// River surface height in elevation levels (negative is down).
    pub river_surface_elevation_offset: f32,
    /// Largest per-vertex darkening of terrain colors, from the hash grid.
    pub color_variation: f32,
    /// Side length of the square hash table.
    pub hash_grid_size: u32,
    /// World-to-hash-table coordinate scale.
    pub hash_grid_scale: f32,
}

/// Fractal noise used to fill the perturbation texture.
#[derive(Clone, Debug, Reflect)]
pub struct NoiseSettings {
    /// Base seed; each of the four channels uses `seed + channel`.
    pub seed: u32,
    /// Fbm octaves.
    pub octaves: usize,
    /// Fbm base frequency over the unit torus.
    pub frequency: f64,
    /// Texture width and height in texels.
    pub texture_size: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            grid: GridSettings {
                chunk_count_x: 4,
                chunk_count_z: 3,
                chunk_size_x: 5,
                chunk_size_z: 5,
                default_color: LinearRgba::WHITE,
                hash_seed: 1234,
            },
            metrics: MetricsSettings::default(),
            noise: NoiseSettings {
                seed: 42,
                octaves: 4,
                frequency: 4.0,
                texture_size: 256,
            },
        }
    }
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            outer_radius: 10.0,
            solid_factor: 0.8,
            elevation_step: 3.0,
            terraces_per_slope: 2,
            cell_perturb_strength: 4.0,
            elevation_perturb_strength: 1.5,
            noise_scale: 0.003,
            stream_bed_elevation_offset: -1.75,
            river_surface_elevation_offset: -0.5,
            color_variation: 0.08,
            hash_grid_size: 256,
            hash_grid_scale: 0.25,
        }
    }
}

impl GridSettings {
    /// Total cells along X.
    pub fn cell_count_x(&self) -> u32 {
        self.chunk_count_x * self.chunk_size_x
    }

    /// Total cells along Z.
    pub fn cell_count_z(&self) -> u32 {
        self.chunk_count_z * self.chunk_size_z
    }
}

impl MapConfig {
    /// A single-tile grid of `width × height` cells, otherwise default.
    pub fn single_tile(width: u32, height: u32) -> Self {
        let mut cfg = Self::default();
        cfg.grid.chunk_count_x = 1;
        cfg.grid.chunk_count_z = 1;
        cfg.grid.chunk_size_x = width;
        cfg.grid.chunk_size_z = height;
        cfg
    }
}
