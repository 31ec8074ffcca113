//! The triangle where three cells meet.
//!
//! Corners are always handed over sorted so that `bottom` is the lowest cell
//! and `left`/`right` follow clockwise. [`CornerStrategy::classify`] picks one
//! of five shapes from the three elevations; the `Pivot` rotates the triangle
//! so that each shape only has to be implemented once.

use bevy::prelude::*;

use super::{CornerVertex, Triangulator};
use crate::metrics::EdgeType;

/// Which input vertex becomes the first argument of a rotated corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pivot {
    /// `(bottom, left, right)`
    Bottom,
    /// `(left, right, bottom)`
    Left,
    /// `(right, bottom, left)`
    Right,
}

impl Pivot {
    pub fn rotate<T>(self, bottom: T, left: T, right: T) -> (T, T, T) {
        match self {
            Self::Bottom => (bottom, left, right),
            Self::Left => (left, right, bottom),
            Self::Right => (right, bottom, left),
        }
    }
}

/// Corner shapes, chosen by the edge types around the corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CornerStrategy {
    /// No slope touches the corner: one plain triangle.
    Triangle,
    /// Both edges from the bottom are slopes: terraces meet from two sides.
    DoubleSlope,
    /// A slope next to a flat edge; the terraces run around the pivot.
    SlopeFlat(Pivot),
    /// Terraces on the left edge, cliff on the right.
    TerracesCliff(Pivot),
    /// Cliff on the left edge, terraces on the right.
    CliffTerraces(Pivot),
}

impl CornerStrategy {
    pub fn classify(bottom: i32, left: i32, right: i32) -> Self {
        use EdgeType::*;

        match (EdgeType::between(bottom, left), EdgeType::between(bottom, right)) {
            (Slope, Slope) => Self::DoubleSlope,
            (Slope, Flat) => Self::SlopeFlat(Pivot::Left),
            (Slope, Cliff) => Self::TerracesCliff(Pivot::Bottom),
            (Flat, Slope) => Self::SlopeFlat(Pivot::Right),
            (Cliff, Slope) => Self::CliffTerraces(Pivot::Bottom),
            _ if EdgeType::between(left, right) == Slope => {
                if left < right {
                    Self::CliffTerraces(Pivot::Right)
                } else {
                    Self::TerracesCliff(Pivot::Left)
                }
            }
            _ => Self::Triangle,
        }
    }
}

impl<'a> Triangulator<'a> {
    pub(super) fn triangulate_corner(
        &mut self,
        bottom: CornerVertex<'a>,
        left: CornerVertex<'a>,
        right: CornerVertex<'a>,
    ) {
        debug_assert!(
            bottom.cell.elevation <= left.cell.elevation
                && bottom.cell.elevation <= right.cell.elevation,
            "corner not sorted by elevation"
        );
        let strategy = CornerStrategy::classify(
            bottom.cell.elevation,
            left.cell.elevation,
            right.cell.elevation,
        );
        match strategy {
            CornerStrategy::Triangle => {
                self.add_terrain_triangle(bottom.position, left.position, right.position);
                self.meshes.terrain.add_triangle_colors(
                    bottom.cell.color,
                    left.cell.color,
                    right.cell.color,
                );
            }
            CornerStrategy::DoubleSlope => self.corner_terraces(bottom, left, right),
            CornerStrategy::SlopeFlat(pivot) => {
                let (b, l, r) = pivot.rotate(bottom, left, right);
                self.corner_terraces(b, l, r);
            }
            CornerStrategy::TerracesCliff(pivot) => {
                let (b, l, r) = pivot.rotate(bottom, left, right);
                self.corner_terraces_cliff(b, l, r);
            }
            CornerStrategy::CliffTerraces(pivot) => {
                let (b, l, r) = pivot.rotate(bottom, left, right);
                self.corner_cliff_terraces(b, l, r);
            }
        }
    }

    /// Terraces fanning out from `begin` towards both `left` and `right`.
    fn corner_terraces(&mut self, begin: CornerVertex, left: CornerVertex, right: CornerVertex) {
        let m = self.metrics;
        let mut v3 = m.terrace_lerp(begin.position, left.position, 1);
        let mut v4 = m.terrace_lerp(begin.position, right.position, 1);
        let mut c3 = m.terrace_color_lerp(begin.cell.color, left.cell.color, 1);
        let mut c4 = m.terrace_color_lerp(begin.cell.color, right.cell.color, 1);

        self.add_terrain_triangle(begin.position, v3, v4);
        self.meshes.terrain.add_triangle_colors(begin.cell.color, c3, c4);

        for step in 2..m.terrace_steps() {
            let (v1, v2, c1, c2) = (v3, v4, c3, c4);
            v3 = m.terrace_lerp(begin.position, left.position, step);
            v4 = m.terrace_lerp(begin.position, right.position, step);
            c3 = m.terrace_color_lerp(begin.cell.color, left.cell.color, step);
            c4 = m.terrace_color_lerp(begin.cell.color, right.cell.color, step);
            self.add_terrain_quad(v1, v2, v3, v4);
            self.meshes.terrain.add_quad_colors(c1, c2, c3, c4);
        }

        self.add_terrain_quad(v3, v4, left.position, right.position);
        self.meshes.terrain.add_quad_colors(c3, c4, left.cell.color, right.cell.color);
    }

    /// Terraces from `begin` to `left` collapse into a point on the cliff towards `right`.
    fn corner_terraces_cliff(
        &mut self,
        begin: CornerVertex,
        left: CornerVertex,
        right: CornerVertex,
    ) {
        let b = 1.0 / right.cell.elevation.abs_diff(begin.cell.elevation) as f32;
        let m = self.metrics;
        let boundary = m.perturb(begin.position).lerp(m.perturb(right.position), b);
        let boundary_color = begin.cell.color.mix(&right.cell.color, b);

        self.boundary_triangle(begin, left, boundary, boundary_color);
        self.close_boundary(left, right, boundary, boundary_color);
    }

    /// Mirror of [`Self::corner_terraces_cliff`]: cliff on the left, terraces on the right.
    fn corner_cliff_terraces(
        &mut self,
        begin: CornerVertex,
        left: CornerVertex,
        right: CornerVertex,
    ) {
        let b = 1.0 / left.cell.elevation.abs_diff(begin.cell.elevation) as f32;
        let m = self.metrics;
        let boundary = m.perturb(begin.position).lerp(m.perturb(left.position), b);
        let boundary_color = begin.cell.color.mix(&left.cell.color, b);

        self.boundary_triangle(right, begin, boundary, boundary_color);
        self.close_boundary(left, right, boundary, boundary_color);
    }

    /// Remaining part between `left`, `right` and the boundary point.
    fn close_boundary(
        &mut self,
        left: CornerVertex,
        right: CornerVertex,
        boundary: Vec3,
        boundary_color: LinearRgba,
    ) {
        if EdgeType::between(left.cell.elevation, right.cell.elevation) == EdgeType::Slope {
            self.boundary_triangle(left, right, boundary, boundary_color);
        } else {
            let m = self.metrics;
            self.meshes.terrain.add_triangle_unperturbed(
                m.perturb(left.position),
                m.perturb(right.position),
                boundary,
            );
            self.meshes.terrain.add_triangle_colors(
                left.cell.color,
                right.cell.color,
                boundary_color,
            );
        }
    }

    /// Terrace steps from `begin` to `left`, each joined to the shared `boundary`.
    ///
    /// `boundary` is already perturbed and must not be displaced again.
    fn boundary_triangle(
        &mut self,
        begin: CornerVertex,
        left: CornerVertex,
        boundary: Vec3,
        boundary_color: LinearRgba,
    ) {
        let m = self.metrics;
        let mut v2 = m.perturb(m.terrace_lerp(begin.position, left.position, 1));
        let mut c2 = m.terrace_color_lerp(begin.cell.color, left.cell.color, 1);

        self.meshes
            .terrain
            .add_triangle_unperturbed(m.perturb(begin.position), v2, boundary);
        self.meshes
            .terrain
            .add_triangle_colors(begin.cell.color, c2, boundary_color);

        for step in 2..m.terrace_steps() {
            let (v1, c1) = (v2, c2);
            v2 = m.perturb(m.terrace_lerp(begin.position, left.position, step));
            c2 = m.terrace_color_lerp(begin.cell.color, left.cell.color, step);
            self.meshes.terrain.add_triangle_unperturbed(v1, v2, boundary);
            self.meshes.terrain.add_triangle_colors(c1, c2, boundary_color);
        }

        self.meshes
            .terrain
            .add_triangle_unperturbed(v2, m.perturb(left.position), boundary);
        self.meshes
            .terrain
            .add_triangle_colors(c2, left.cell.color, boundary_color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::HexCell;
    use crate::config::MetricsSettings;
    use crate::coordinates::HexCoordinates;
    use crate::mesh_buffer::TileMeshes;
    use crate::metrics::{ConstantNoise, HexMetrics};

    fn metrics() -> HexMetrics {
        HexMetrics::new(&MetricsSettings::default(), Box::new(ConstantNoise::NEUTRAL), 0)
    }

    fn cell(elevation: i32, color: LinearRgba) -> HexCell {
        let mut cell = HexCell::new(HexCoordinates::new(0, 0), Vec3::ZERO, color);
        cell.elevation = elevation;
        cell
    }

    /// Triangulates one corner from `(position, cell)` triples, bottom first.
    fn corner(m: &HexMetrics, cells: &[HexCell; 3], positions: [Vec3; 3]) -> TileMeshes {
        let mut meshes = TileMeshes::default();
        let [b, l, r] = positions;
        Triangulator::new(cells, m, &mut meshes).triangulate_corner(
            CornerVertex { position: b, cell: &cells[0] },
            CornerVertex { position: l, cell: &cells[1] },
            CornerVertex { position: r, cell: &cells[2] },
        );
        meshes
    }

    #[test]
    fn two_slopes_are_double_slope() {
        assert_eq!(CornerStrategy::classify(0, 1, 1), CornerStrategy::DoubleSlope);
    }

    #[test]
    fn slope_next_to_flat_pivots_on_the_slope_side() {
        assert_eq!(CornerStrategy::classify(0, 1, 0), CornerStrategy::SlopeFlat(Pivot::Left));
        assert_eq!(CornerStrategy::classify(0, 0, 1), CornerStrategy::SlopeFlat(Pivot::Right));
    }

    #[test]
    fn slope_next_to_cliff() {
        assert_eq!(
            CornerStrategy::classify(0, 1, 3),
            CornerStrategy::TerracesCliff(Pivot::Bottom)
        );
        assert_eq!(
            CornerStrategy::classify(0, 3, 1),
            CornerStrategy::CliffTerraces(Pivot::Bottom)
        );
    }

    #[test]
    fn slope_between_two_high_cells_above_a_cliff() {
        assert_eq!(
            CornerStrategy::classify(0, 2, 3),
            CornerStrategy::CliffTerraces(Pivot::Right)
        );
        assert_eq!(
            CornerStrategy::classify(0, 3, 2),
            CornerStrategy::TerracesCliff(Pivot::Left)
        );
    }

    #[test]
    fn flat_and_cliff_only_is_a_triangle() {
        assert_eq!(CornerStrategy::classify(0, 0, 0), CornerStrategy::Triangle);
        assert_eq!(CornerStrategy::classify(0, 2, 2), CornerStrategy::Triangle);
        assert_eq!(CornerStrategy::classify(0, 0, 4), CornerStrategy::Triangle);
        assert_eq!(CornerStrategy::classify(0, 2, 5), CornerStrategy::Triangle);
    }

    #[test]
    fn pivot_rotation_is_cyclic() {
        assert_eq!(Pivot::Bottom.rotate(1, 2, 3), (1, 2, 3));
        assert_eq!(Pivot::Left.rotate(1, 2, 3), (2, 3, 1));
        assert_eq!(Pivot::Right.rotate(1, 2, 3), (3, 1, 2));
    }

    // ── Cliff boundaries ────────────────────────────────────────────

    #[test]
    fn cliff_boundary_color_matches_its_position() {
        let m = metrics();
        let cells = [
            cell(0, LinearRgba::RED),
            cell(1, LinearRgba::GREEN),
            cell(3, LinearRgba::BLUE),
        ];
        let bottom = Vec3::ZERO;
        let right = Vec3::new(6.0, 9.0, 3.0);
        let meshes = corner(&m, &cells, [bottom, Vec3::new(9.0, 3.0, -3.0), right]);

        let boundary = bottom.lerp(right, 1.0 / 3.0);
        let at_boundary: Vec<LinearRgba> = meshes
            .terrain
            .positions
            .iter()
            .zip(&meshes.terrain.colors)
            .filter(|(p, _)| p.distance(boundary) < 1e-4)
            .map(|(_, &c)| c)
            .collect();

        // One triangle per terrace step, plus the one closing the cliff.
        assert_eq!(at_boundary.len(), m.terrace_steps() as usize + 1);
        for c in at_boundary {
            assert!((c.red - 2.0 / 3.0).abs() < 1e-5, "{c:?}");
            assert!(c.green.abs() < 1e-6, "{c:?}");
            assert!((c.blue - 1.0 / 3.0).abs() < 1e-5, "{c:?}");
        }
    }

    #[test]
    fn extreme_cliffs_do_not_overflow() {
        let m = metrics();
        let positions = [Vec3::ZERO, Vec3::new(9.0, 3.0, -3.0), Vec3::new(6.0, 9.0, 3.0)];
        let steps = m.terrace_steps() as usize;

        let terraces_cliff = [
            cell(-5, LinearRgba::WHITE),
            cell(-4, LinearRgba::WHITE),
            cell(i32::MAX, LinearRgba::WHITE),
        ];
        let meshes = corner(&m, &terraces_cliff, positions);
        assert_eq!(meshes.terrain.triangle_count(), steps + 1);

        let cliff_terraces = [
            cell(i32::MIN, LinearRgba::WHITE),
            cell(i32::MAX, LinearRgba::WHITE),
            cell(i32::MIN + 1, LinearRgba::WHITE),
        ];
        let meshes = corner(&m, &cliff_terraces, positions);
        assert_eq!(meshes.terrain.triangle_count(), steps + 1);
    }
}
