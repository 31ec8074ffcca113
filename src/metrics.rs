//! Geometric constants and helpers shared by every triangulation routine.
//!
//! A single [`HexMetrics`] is built per grid and passed by reference; nothing
//! here is global.

mod hash_grid;
mod noise;

pub use self::hash_grid::{HashGrid, HexHash};
pub use self::noise::{ConstantNoise, NoiseSource, NoiseTexture};

use bevy::prelude::*;
use hexx::HexLayout;

use crate::config::MetricsSettings;
use crate::coordinates::{HexCoordinates, HexDirection};
use crate::math;

/// Inner radius = outer radius × √3/2.
pub const OUTER_TO_INNER: f32 = 0.866_025_4;
/// Outer radius = inner radius × 2/√3.
pub const INNER_TO_OUTER: f32 = 1.0 / OUTER_TO_INNER;

/// How two adjacent cells meet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Reflect)]
pub enum EdgeType {
    /// Same elevation.
    Flat,
    /// One level apart; triangulated as terraces.
    Slope,
    /// Two or more levels apart.
    Cliff,
}

impl EdgeType {
    pub fn between(a: i32, b: i32) -> Self {
        match a.abs_diff(b) {
            0 => Self::Flat,
            1 => Self::Slope,
            _ => Self::Cliff,
        }
    }
}

/// Derived geometry for one grid configuration.
pub struct HexMetrics {
    outer_radius: f32,
    inner_radius: f32,
    solid_factor: f32,
    blend_factor: f32,
    elevation_step: f32,
    terraces_per_slope: u32,
    terrace_steps: u32,
    horizontal_terrace_step: f32,
    vertical_terrace_step: f32,
    cell_perturb_strength: f32,
    elevation_perturb_strength: f32,
    noise_scale: f32,
    stream_bed_elevation_offset: f32,
    river_surface_elevation_offset: f32,
    color_variation: f32,
    layout: HexLayout,
    corners: [Vec3; 7],
    noise: Box<dyn NoiseSource>,
    hash_grid: HashGrid,
}

impl HexMetrics {
    pub fn new(m: &MetricsSettings, noise: Box<dyn NoiseSource>, hash_seed: u64) -> Self {
        let outer = m.outer_radius;
        let inner = outer * OUTER_TO_INNER;
        let terrace_steps = m.terraces_per_slope * 2 + 1;
        let corners = [
            Vec3::new(0.0, 0.0, outer),
            Vec3::new(inner, 0.0, 0.5 * outer),
            Vec3::new(inner, 0.0, -0.5 * outer),
            Vec3::new(0.0, 0.0, -outer),
            Vec3::new(-inner, 0.0, -0.5 * outer),
            Vec3::new(-inner, 0.0, 0.5 * outer),
            Vec3::new(0.0, 0.0, outer),
        ];
        Self {
            outer_radius: outer,
            inner_radius: inner,
            solid_factor: m.solid_factor,
            blend_factor: 1.0 - m.solid_factor,
            elevation_step: m.elevation_step,
            terraces_per_slope: m.terraces_per_slope,
            terrace_steps,
            horizontal_terrace_step: 1.0 / terrace_steps as f32,
            vertical_terrace_step: 1.0 / (m.terraces_per_slope + 1) as f32,
            cell_perturb_strength: m.cell_perturb_strength,
            elevation_perturb_strength: m.elevation_perturb_strength,
            noise_scale: m.noise_scale,
            stream_bed_elevation_offset: m.stream_bed_elevation_offset,
            river_surface_elevation_offset: m.river_surface_elevation_offset,
            color_variation: m.color_variation,
            layout: HexLayout::pointy().with_hex_size(outer),
            corners,
            noise,
            hash_grid: HashGrid::new(hash_seed, m.hash_grid_size, m.hash_grid_scale),
        }
    }

    pub fn outer_radius(&self) -> f32 {
        self.outer_radius
    }

    pub fn inner_radius(&self) -> f32 {
        self.inner_radius
    }

    pub fn solid_factor(&self) -> f32 {
        self.solid_factor
    }

    pub fn blend_factor(&self) -> f32 {
        self.blend_factor
    }

    pub fn elevation_step(&self) -> f32 {
        self.elevation_step
    }

    pub fn terraces_per_slope(&self) -> u32 {
        self.terraces_per_slope
    }

    /// Number of strips in a terraced slope, `2 · terraces_per_slope + 1`.
    pub fn terrace_steps(&self) -> u32 {
        self.terrace_steps
    }

    // ── Corners & bridges ───────────────────────────────────────────

    pub fn first_corner(&self, d: HexDirection) -> Vec3 {
        self.corners[d.index()]
    }

    pub fn second_corner(&self, d: HexDirection) -> Vec3 {
        self.corners[d.index() + 1]
    }

    pub fn first_solid_corner(&self, d: HexDirection) -> Vec3 {
        self.first_corner(d) * self.solid_factor
    }

    pub fn second_solid_corner(&self, d: HexDirection) -> Vec3 {
        self.second_corner(d) * self.solid_factor
    }

    /// Midpoint of the solid edge facing `d`, relative to the cell center.
    pub fn solid_edge_middle(&self, d: HexDirection) -> Vec3 {
        (self.first_corner(d) + self.second_corner(d)) * (0.5 * self.solid_factor)
    }

    /// Offset from a solid edge to the matching solid edge of the neighbor.
    pub fn bridge(&self, d: HexDirection) -> Vec3 {
        (self.first_corner(d) + self.second_corner(d)) * self.blend_factor
    }

    /// Pointy hex layout in the XZ plane; layout `y` is world `z`.
    pub fn layout(&self) -> &HexLayout {
        &self.layout
    }

    /// World-space center of the cell at offset `(col, row)`, at height zero.
    pub fn cell_center(&self, col: i32, row: i32) -> Vec3 {
        let hex = HexCoordinates::from_offset(col, row).hex();
        let p = self.layout.hex_to_world_pos(hex);
        Vec3::new(p.x, 0.0, p.y)
    }

    // ── Terraces ────────────────────────────────────────────────────

    /// Point `step` of a terraced slope from `a` to `b`.
    ///
    /// Horizontal progress is linear in `step`; height only rises on odd steps,
    /// which produces the flat ledges.
    pub fn terrace_lerp(&self, a: Vec3, b: Vec3, step: u32) -> Vec3 {
        let h = step as f32 * self.horizontal_terrace_step;
        let v = step.div_ceil(2) as f32 * self.vertical_terrace_step;
        Vec3::new(a.x + (b.x - a.x) * h, a.y + (b.y - a.y) * v, a.z + (b.z - a.z) * h)
    }

    pub fn terrace_color_lerp(&self, a: LinearRgba, b: LinearRgba, step: u32) -> LinearRgba {
        a.mix(&b, step as f32 * self.horizontal_terrace_step)
    }

    // ── Elevation ───────────────────────────────────────────────────

    /// Height of a cell center: elevation levels plus vertical jitter.
    pub fn elevation_y(&self, elevation: i32, position: Vec3) -> f32 {
        let jitter = math::signed_channel(self.sample_noise(position).y);
        elevation as f32 * self.elevation_step + jitter * self.elevation_perturb_strength
    }

    pub fn stream_bed_y(&self, elevation: i32) -> f32 {
        (elevation as f32 + self.stream_bed_elevation_offset) * self.elevation_step
    }

    pub fn river_surface_y(&self, elevation: i32) -> f32 {
        (elevation as f32 + self.river_surface_elevation_offset) * self.elevation_step
    }

    // ── Noise ───────────────────────────────────────────────────────

    pub fn sample_noise(&self, position: Vec3) -> Vec4 {
        self.noise
            .sample(position.x * self.noise_scale, position.z * self.noise_scale)
    }

    /// Displaces `position` horizontally; height is left alone.
    pub fn perturb(&self, position: Vec3) -> Vec3 {
        let s = self.sample_noise(position);
        Vec3::new(
            position.x + math::signed_channel(s.x) * self.cell_perturb_strength,
            position.y,
            position.z + math::signed_channel(s.z) * self.cell_perturb_strength,
        )
    }

    pub fn sample_hash_grid(&self, position: Vec3) -> HexHash {
        self.hash_grid.sample(position)
    }

    /// Darkens `color` by up to `color_variation`, keyed on the hash grid at
    /// `position`. Alpha is kept.
    pub fn vary_color(&self, color: LinearRgba, position: Vec3) -> LinearRgba {
        if self.color_variation <= 0.0 {
            return color;
        }
        let shade = 1.0 - self.color_variation * self.sample_hash_grid(position).a;
        LinearRgba::new(color.red * shade, color.green * shade, color.blue * shade, color.alpha)
    }
}
