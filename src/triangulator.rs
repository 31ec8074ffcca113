//! Turns cells into triangles.
//!
//! Each cell triangulates its six solid wedges, then the three edge
//! connections (NE, E, SE) and two corners (NE, E) it owns, so every shared
//! piece of geometry is emitted exactly once. Terrain vertices are perturbed
//! as they are emitted; corner boundary points are perturbed up front and
//! bypass that step.

mod corner;
mod edge_vertices;
mod river;

pub use corner::{CornerStrategy, Pivot};
pub use edge_vertices::EdgeVertices;

use bevy::prelude::*;

use crate::cell::{CellId, HexCell};
use crate::coordinates::HexDirection;
use crate::mesh_buffer::TileMeshes;
use crate::metrics::{EdgeType, HexMetrics};

/// A corner position paired with the cell it belongs to.
#[derive(Clone, Copy)]
pub(crate) struct CornerVertex<'a> {
    position: Vec3,
    cell: &'a HexCell,
}

/// Writes the geometry of a set of cells into one tile's buffers.
pub struct Triangulator<'a> {
    cells: &'a [HexCell],
    metrics: &'a HexMetrics,
    meshes: &'a mut TileMeshes,
}

impl<'a> Triangulator<'a> {
    pub fn new(cells: &'a [HexCell], metrics: &'a HexMetrics, meshes: &'a mut TileMeshes) -> Self {
        Self {
            cells,
            metrics,
            meshes,
        }
    }

    pub fn triangulate(&mut self, ids: &[CellId]) {
        for &id in ids {
            let cell = self.cell(id);
            for direction in HexDirection::ALL {
                self.triangulate_direction(direction, cell);
            }
        }
    }

    fn cell(&self, id: CellId) -> &'a HexCell {
        let cells = self.cells;
        &cells[id.index()]
    }

    fn neighbor(&self, cell: &HexCell, direction: HexDirection) -> Option<&'a HexCell> {
        cell.neighbor(direction).map(|id| self.cell(id))
    }

    fn triangulate_direction(&mut self, direction: HexDirection, cell: &'a HexCell) {
        let m = self.metrics;
        let center = cell.position;
        let mut e = EdgeVertices::new(
            center + m.first_solid_corner(direction),
            center + m.second_solid_corner(direction),
        );

        if cell.has_river() {
            if cell.has_river_through_edge(direction) {
                e.v3.y = cell.stream_bed_y(m);
                if cell.has_river_begin_or_end() {
                    self.triangulate_with_river_begin_or_end(cell, center, &e);
                } else {
                    self.triangulate_with_river(direction, cell, center, &e);
                }
            } else {
                self.triangulate_adjacent_to_river(direction, cell, center, &e);
            }
        } else {
            self.triangulate_edge_fan(center, &e, cell.color);
        }

        if direction.owns_connection() {
            self.triangulate_connection(direction, cell, &e);
        }
    }

    // ── Connections ─────────────────────────────────────────────────

    fn triangulate_connection(&mut self, direction: HexDirection, cell: &'a HexCell, e1: &EdgeVertices) {
        let Some(neighbor) = self.neighbor(cell, direction) else {
            return;
        };
        let m = self.metrics;

        let mut bridge = m.bridge(direction);
        bridge.y = neighbor.position.y - cell.position.y;
        let mut e2 = EdgeVertices::new(e1.v1 + bridge, e1.v5 + bridge);

        if cell.has_river_through_edge(direction) {
            e2.v3.y = neighbor.stream_bed_y(m);
            self.triangulate_river_quad(
                [e1.v2, e1.v4, e2.v2, e2.v4],
                cell.river_surface_y(m),
                neighbor.river_surface_y(m),
                0.8,
                cell.incoming_river == Some(direction),
            );
        }

        if EdgeType::between(cell.elevation, neighbor.elevation) == EdgeType::Slope {
            self.triangulate_edge_terraces(e1, cell, &e2, neighbor);
        } else {
            self.triangulate_edge_strip(e1, cell.color, &e2, neighbor.color);
        }

        if !direction.owns_corner() {
            return;
        }
        let Some(next) = self.neighbor(cell, direction.next()) else {
            return;
        };
        let mut v5 = e1.v5 + m.bridge(direction.next());
        v5.y = next.position.y;

        let own = CornerVertex { position: e1.v5, cell };
        let across = CornerVertex { position: e2.v5, cell: neighbor };
        let ahead = CornerVertex { position: v5, cell: next };

        if cell.elevation <= neighbor.elevation {
            if cell.elevation <= next.elevation {
                self.triangulate_corner(own, across, ahead);
            } else {
                self.triangulate_corner(ahead, own, across);
            }
        } else if neighbor.elevation <= next.elevation {
            self.triangulate_corner(across, ahead, own);
        } else {
            self.triangulate_corner(ahead, own, across);
        }
    }

    /// `terrace_steps` strips between two edges one elevation level apart.
    fn triangulate_edge_terraces(
        &mut self,
        begin: &EdgeVertices,
        begin_cell: &HexCell,
        end: &EdgeVertices,
        end_cell: &HexCell,
    ) {
        let m = self.metrics;
        let mut e2 = EdgeVertices::terrace_lerp(begin, end, 1, m);
        let mut c2 = m.terrace_color_lerp(begin_cell.color, end_cell.color, 1);
        self.triangulate_edge_strip(begin, begin_cell.color, &e2, c2);

        for step in 2..m.terrace_steps() {
            let (e1, c1) = (e2, c2);
            e2 = EdgeVertices::terrace_lerp(begin, end, step, m);
            c2 = m.terrace_color_lerp(begin_cell.color, end_cell.color, step);
            self.triangulate_edge_strip(&e1, c1, &e2, c2);
        }

        self.triangulate_edge_strip(&e2, c2, end, end_cell.color);
    }

    // ── Primitives ──────────────────────────────────────────────────

    fn triangulate_edge_fan(&mut self, center: Vec3, edge: &EdgeVertices, color: LinearRgba) {
        let p = edge.points();
        for pair in p.windows(2) {
            self.add_terrain_triangle(center, pair[0], pair[1]);
            self.meshes.terrain.add_triangle_color(color);
        }
    }

    fn triangulate_edge_strip(
        &mut self,
        e1: &EdgeVertices,
        c1: LinearRgba,
        e2: &EdgeVertices,
        c2: LinearRgba,
    ) {
        let (near, far) = (e1.points(), e2.points());
        for (a, b) in near.windows(2).zip(far.windows(2)) {
            self.add_terrain_quad(a[0], a[1], b[0], b[1]);
            self.meshes.terrain.add_quad_color2(c1, c2);
        }
    }

    fn add_terrain_triangle(&mut self, v1: Vec3, v2: Vec3, v3: Vec3) {
        let m = self.metrics;
        self.meshes
            .terrain
            .add_triangle_unperturbed(m.perturb(v1), m.perturb(v2), m.perturb(v3));
    }

    fn add_terrain_quad(&mut self, v1: Vec3, v2: Vec3, v3: Vec3, v4: Vec3) {
        let m = self.metrics;
        self.meshes.terrain.add_quad_unperturbed(
            m.perturb(v1),
            m.perturb(v2),
            m.perturb(v3),
            m.perturb(v4),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::HexCell;
    use crate::config::MapConfig;
    use crate::coordinates::HexCoordinates;
    use crate::metrics::ConstantNoise;

    /// Minimal stand-alone grid: a single row of cells linked east-west.
    struct Row {
        cells: Vec<HexCell>,
        metrics: HexMetrics,
    }

    impl Row {
        fn new(elevations: &[i32]) -> Self {
            let cfg = MapConfig::default();
            let metrics = HexMetrics::new(&cfg.metrics, Box::new(ConstantNoise::NEUTRAL), 0);
            let mut cells: Vec<HexCell> = elevations
                .iter()
                .enumerate()
                .map(|(col, &elevation)| {
                    let mut position = metrics.cell_center(col as i32, 0);
                    position.y = metrics.elevation_y(elevation, position);
                    let mut cell = HexCell::new(
                        HexCoordinates::from_offset(col as i32, 0),
                        position,
                        LinearRgba::WHITE,
                    );
                    cell.elevation = elevation;
                    cell
                })
                .collect();
            for i in 1..cells.len() {
                cells[i].neighbors[HexDirection::W.index()] = Some(CellId(i - 1));
                cells[i - 1].neighbors[HexDirection::E.index()] = Some(CellId(i));
            }
            Self { cells, metrics }
        }

        fn triangulate(&self) -> TileMeshes {
            let mut meshes = TileMeshes::default();
            let ids: Vec<CellId> = (0..self.cells.len()).map(CellId).collect();
            Triangulator::new(&self.cells, &self.metrics, &mut meshes).triangulate(&ids);
            meshes
        }
    }

    #[test]
    fn lone_flat_cell_is_six_fans() {
        let meshes = Row::new(&[0]).triangulate();
        assert_eq!(meshes.terrain.triangle_count(), 24);
        assert_eq!(meshes.terrain.colors.len(), meshes.terrain.vertex_count());
        assert!(meshes.rivers.is_empty());
    }

    #[test]
    fn flat_pair_adds_one_strip() {
        let meshes = Row::new(&[0, 0]).triangulate();
        assert_eq!(meshes.terrain.triangle_count(), 24 + 24 + 8);
    }

    #[test]
    fn cliff_pair_adds_one_strip() {
        let meshes = Row::new(&[0, 4]).triangulate();
        assert_eq!(meshes.terrain.triangle_count(), 24 + 24 + 8);
    }

    #[test]
    fn slope_pair_adds_terraced_strips() {
        let row = Row::new(&[0, 1]);
        let steps = row.metrics.terrace_steps() as usize;
        let meshes = row.triangulate();
        assert_eq!(meshes.terrain.triangle_count(), 24 + 24 + steps * 8);
    }

    #[test]
    fn slope_has_terrace_steps_plus_one_cross_sections() {
        let row = Row::new(&[0, 1]);
        let m = &row.metrics;
        let meshes = row.triangulate();

        let start = m.solid_factor() * m.inner_radius();
        let end = 2.0 * m.inner_radius() - start;
        let mut xs: Vec<i64> = meshes
            .terrain
            .positions
            .iter()
            .filter(|p| p.x >= start - 1e-3 && p.x <= end + 1e-3)
            .map(|p| (p.x * 1000.0).round() as i64)
            .collect();
        xs.sort_unstable();
        xs.dedup();
        assert_eq!(xs.len(), m.terrace_steps() as usize + 1);
    }

    #[test]
    fn slope_terraces_rise_in_ledges() {
        let row = Row::new(&[0, 1]);
        let m = &row.metrics;
        let meshes = row.triangulate();

        let mut heights: Vec<i64> = meshes
            .terrain
            .positions
            .iter()
            .map(|p| (p.y * 1000.0).round() as i64)
            .collect();
        heights.sort_unstable();
        heights.dedup();
        // Ground, one ledge per terrace, and the upper cell.
        assert_eq!(heights.len(), m.terraces_per_slope() as usize + 2);
    }
}
