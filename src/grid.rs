//! The cell arena and every rule that mutates it.
//!
//! All edits funnel through [`HexGrid`] so that neighbor links stay
//! symmetric, rivers only run downhill (or out of a lake), roads never share
//! an edge with a river or climb a cliff, and every change marks the tiles
//! whose geometry it affects.

use bevy::prelude::*;
use hexx::shapes;

use crate::cell::{CellId, HexCell};
use crate::chunk::ChunkScheduler;
use crate::config::MapConfig;
use crate::coordinates::{HexCoordinates, HexDirection};
use crate::error::GridError;
use crate::mesh_buffer::TileMeshes;
use crate::metrics::{EdgeType, HexMetrics, NoiseSource};

/// River part of a [`CellEdit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RiverEdit {
    /// Start a river leaving the cell through this edge.
    Outgoing(HexDirection),
    /// Remove both incoming and outgoing rivers.
    Clear,
}

/// Road part of a [`CellEdit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoadEdit {
    /// Add a road through this edge.
    Add(HexDirection),
    /// Remove every road of the cell.
    Clear,
}

/// Sparse set of attribute changes; `None` fields are left alone.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CellEdit {
    pub color: Option<LinearRgba>,
    pub elevation: Option<i32>,
    pub water_level: Option<i32>,
    pub river: Option<RiverEdit>,
    pub road: Option<RoadEdit>,
}

pub struct HexGrid {
    cells: Vec<HexCell>,
    cell_count_x: usize,
    cell_count_z: usize,
    metrics: HexMetrics,
    chunks: ChunkScheduler,
}

impl HexGrid {
    /// Builds every cell, wires neighbors and marks all tiles for the first rebuild.
    pub fn new(cfg: &MapConfig, noise: Box<dyn NoiseSource>) -> Result<Self, GridError> {
        validate(cfg)?;
        let g = &cfg.grid;
        let (count_x, count_z) = (g.cell_count_x() as usize, g.cell_count_z() as usize);

        let mut grid = Self {
            cells: Vec::with_capacity(count_x * count_z),
            cell_count_x: count_x,
            cell_count_z: count_z,
            metrics: HexMetrics::new(&cfg.metrics, noise, g.hash_seed),
            chunks: ChunkScheduler::new(g),
        };
        for z in 0..count_z {
            for x in 0..count_x {
                grid.create_cell(x, z, g.default_color);
            }
        }
        for i in 0..grid.cells.len() {
            grid.set_elevation(CellId(i), 0);
        }
        grid.chunks.refresh_all();

        info!(
            "built hex grid: {count_x}×{count_z} cells in {} tiles",
            grid.chunks.chunk_count()
        );
        Ok(grid)
    }

    fn create_cell(&mut self, x: usize, z: usize, color: LinearRgba) {
        let id = CellId(self.cells.len());
        let position = self.metrics.cell_center(x as i32, z as i32);
        let mut cell = HexCell::new(
            HexCoordinates::from_offset(x as i32, z as i32),
            position,
            color,
        );
        cell.chunk = self.chunks.chunk_index_for_offset(x, z);
        self.chunks.add_cell(cell.chunk, id);
        self.cells.push(cell);

        let (i, w) = (id.0, self.cell_count_x);
        if x > 0 {
            self.set_neighbor(id, HexDirection::W, CellId(i - 1));
        }
        if z > 0 {
            if z % 2 == 0 {
                self.set_neighbor(id, HexDirection::SE, CellId(i - w));
                if x > 0 {
                    self.set_neighbor(id, HexDirection::SW, CellId(i - w - 1));
                }
            } else {
                self.set_neighbor(id, HexDirection::SW, CellId(i - w));
                if x < w - 1 {
                    self.set_neighbor(id, HexDirection::SE, CellId(i - w + 1));
                }
            }
        }
    }

    /// The only place neighbor links are written; always sets both sides.
    fn set_neighbor(&mut self, id: CellId, direction: HexDirection, other: CellId) {
        self.cells[id.0].neighbors[direction.index()] = Some(other);
        self.cells[other.0].neighbors[direction.opposite().index()] = Some(id);
    }

    // ── Lookup ──────────────────────────────────────────────────────

    pub fn cell_count_x(&self) -> usize {
        self.cell_count_x
    }

    pub fn cell_count_z(&self) -> usize {
        self.cell_count_z
    }

    pub fn metrics(&self) -> &HexMetrics {
        &self.metrics
    }

    pub fn chunks(&self) -> &ChunkScheduler {
        &self.chunks
    }

    pub fn cells(&self) -> &[HexCell] {
        &self.cells
    }

    /// Arena index of `coordinates`, or `None` outside the grid.
    pub fn cell_id(&self, coordinates: HexCoordinates) -> Option<CellId> {
        let z = coordinates.z();
        if z < 0 || z as usize >= self.cell_count_z {
            return None;
        }
        let x = coordinates.x().checked_add(z / 2)?;
        if x < 0 || x as usize >= self.cell_count_x {
            return None;
        }
        Some(CellId(x as usize + z as usize * self.cell_count_x))
    }

    pub fn cell(&self, coordinates: HexCoordinates) -> Option<&HexCell> {
        self.cell_id(coordinates).map(|id| &self.cells[id.0])
    }

    pub fn cell_by_id(&self, id: CellId) -> &HexCell {
        &self.cells[id.0]
    }

    /// Cell under a world-space point, ignoring height.
    pub fn cell_at_position(&self, position: Vec3) -> Option<CellId> {
        HexCoordinates::from_position(position, &self.metrics).and_then(|c| self.cell_id(c))
    }

    /// Edge of `from` that touches `to`, if they are neighbors.
    pub fn direction_between(&self, from: CellId, to: CellId) -> Option<HexDirection> {
        HexDirection::ALL
            .into_iter()
            .find(|&d| self.cells[from.0].neighbor(d) == Some(to))
    }

    pub fn elevation_difference(&self, id: CellId, direction: HexDirection) -> Option<u32> {
        let cell = &self.cells[id.0];
        let neighbor = &self.cells[cell.neighbor(direction)?.0];
        Some(cell.elevation.abs_diff(neighbor.elevation))
    }

    pub fn edge_type(&self, id: CellId, direction: HexDirection) -> Option<EdgeType> {
        let cell = &self.cells[id.0];
        let neighbor = &self.cells[cell.neighbor(direction)?.0];
        Some(EdgeType::between(cell.elevation, neighbor.elevation))
    }

    // ── Invalidation ────────────────────────────────────────────────

    /// Marks the cell's tile and any different tile of its neighbors.
    fn refresh(&mut self, id: CellId) {
        let cell = &self.cells[id.0];
        self.chunks.refresh(cell.chunk);
        for n in cell.neighbors.iter().flatten() {
            let chunk = self.cells[n.0].chunk;
            if chunk != cell.chunk {
                self.chunks.refresh(chunk);
            }
        }
    }

    fn refresh_self_only(&mut self, id: CellId) {
        self.chunks.refresh(self.cells[id.0].chunk);
    }

    /// Rebuilds every dirty tile; see [`ChunkScheduler::triangulate_dirty`].
    ///
    /// The sink also gets the grid's metrics for post-processing the buffers.
    pub fn triangulate_dirty(
        &mut self,
        mut sink: impl FnMut(usize, &TileMeshes, &HexMetrics),
    ) -> usize {
        let Self {
            cells,
            metrics,
            chunks,
            ..
        } = self;
        let metrics: &HexMetrics = metrics;
        chunks.triangulate_dirty(cells, metrics, |index, meshes| sink(index, meshes, metrics))
    }

    // ── Attributes ──────────────────────────────────────────────────

    pub fn set_color(&mut self, id: CellId, color: LinearRgba) {
        if self.cells[id.0].color == color {
            return;
        }
        self.cells[id.0].color = color;
        self.refresh(id);
    }

    /// Moves the cell up or down, then drops rivers and roads the new height forbids.
    pub fn set_elevation(&mut self, id: CellId, elevation: i32) {
        let cell = &mut self.cells[id.0];
        if cell.elevation == elevation {
            return;
        }
        cell.elevation = elevation;
        cell.position.y = self.metrics.elevation_y(elevation, cell.position);

        self.validate_rivers(id);
        for d in HexDirection::ALL {
            if self.cells[id.0].has_road_through_edge(d)
                && self.elevation_difference(id, d).is_some_and(|diff| diff > 1)
            {
                self.set_road(id, d, false);
            }
        }
        self.refresh(id);
    }

    pub fn set_water_level(&mut self, id: CellId, water_level: i32) {
        if self.cells[id.0].water_level == water_level {
            return;
        }
        self.cells[id.0].water_level = water_level;
        self.validate_rivers(id);
        self.refresh(id);
    }

    // ── Rivers ──────────────────────────────────────────────────────

    /// Water from `from` may flow into `to`: downhill or level, or out of a lake
    /// whose surface is level with `to`.
    fn is_valid_river_destination(&self, from: CellId, to: Option<CellId>) -> bool {
        let Some(to) = to else { return false };
        let (a, b) = (&self.cells[from.0], &self.cells[to.0]);
        a.elevation >= b.elevation || a.water_level == b.elevation
    }

    fn validate_rivers(&mut self, id: CellId) {
        let cell = &self.cells[id.0];
        if let Some(d) = cell.outgoing_river
            && !self.is_valid_river_destination(id, cell.neighbor(d))
        {
            self.remove_outgoing_river(id);
        }
        let cell = &self.cells[id.0];
        if let Some(d) = cell.incoming_river
            && !cell
                .neighbor(d)
                .is_some_and(|source| self.is_valid_river_destination(source, Some(id)))
        {
            self.remove_incoming_river(id);
        }
    }

    /// Starts a river through `direction`; rejected silently when the
    /// neighbor is missing or uphill.
    pub fn set_outgoing_river(&mut self, id: CellId, direction: HexDirection) {
        let cell = &self.cells[id.0];
        if cell.outgoing_river == Some(direction) {
            return;
        }
        let target = cell.neighbor(direction);
        let Some(neighbor) = target.filter(|_| self.is_valid_river_destination(id, target)) else {
            trace!(
                "river from {} towards {direction:?} rejected",
                cell.coordinates
            );
            return;
        };

        self.remove_outgoing_river(id);
        if self.cells[id.0].incoming_river == Some(direction) {
            self.remove_incoming_river(id);
        }
        self.cells[id.0].outgoing_river = Some(direction);

        self.remove_incoming_river(neighbor);
        self.cells[neighbor.0].incoming_river = Some(direction.opposite());

        self.set_road(id, direction, false);
    }

    pub fn remove_outgoing_river(&mut self, id: CellId) {
        let Some(d) = self.cells[id.0].outgoing_river.take() else {
            return;
        };
        self.refresh_self_only(id);
        if let Some(n) = self.cells[id.0].neighbor(d) {
            self.cells[n.0].incoming_river = None;
            self.refresh_self_only(n);
        }
    }

    pub fn remove_incoming_river(&mut self, id: CellId) {
        let Some(d) = self.cells[id.0].incoming_river.take() else {
            return;
        };
        self.refresh_self_only(id);
        if let Some(n) = self.cells[id.0].neighbor(d) {
            self.cells[n.0].outgoing_river = None;
            self.refresh_self_only(n);
        }
    }

    pub fn remove_river(&mut self, id: CellId) {
        self.remove_outgoing_river(id);
        self.remove_incoming_river(id);
    }

    // ── Roads ───────────────────────────────────────────────────────

    /// Adds a road unless the edge carries a river, has no neighbor, or is too steep.
    pub fn add_road(&mut self, id: CellId, direction: HexDirection) {
        let cell = &self.cells[id.0];
        if cell.has_road_through_edge(direction) {
            return;
        }
        let allowed = !cell.has_river_through_edge(direction)
            && self
                .elevation_difference(id, direction)
                .is_some_and(|diff| diff <= 1);
        if allowed {
            self.set_road(id, direction, true);
        } else {
            trace!("road from {} towards {direction:?} rejected", cell.coordinates);
        }
    }

    pub fn remove_roads(&mut self, id: CellId) {
        for d in HexDirection::ALL {
            if self.cells[id.0].has_road_through_edge(d) {
                self.set_road(id, d, false);
            }
        }
    }

    fn set_road(&mut self, id: CellId, direction: HexDirection, state: bool) {
        let Some(n) = self.cells[id.0].neighbor(direction) else {
            return;
        };
        self.cells[id.0].roads[direction.index()] = state;
        self.cells[n.0].roads[direction.opposite().index()] = state;
        self.refresh_self_only(n);
        self.refresh_self_only(id);
    }

    // ── Editing ─────────────────────────────────────────────────────

    /// Applies `edit` to the cell at `coordinates`; `false` if it lies outside the grid.
    ///
    /// Order: color, elevation, water level, river, road. Rivers and roads are
    /// checked against the new elevation and water level.
    pub fn edit_cell(&mut self, coordinates: HexCoordinates, edit: &CellEdit) -> bool {
        let Some(id) = self.cell_id(coordinates) else {
            return false;
        };
        self.apply_edit(id, edit);
        true
    }

    /// Applies `edit` to every cell within `radius` steps of `center`.
    /// Returns how many cells were inside the grid.
    pub fn edit_cells(&mut self, center: HexCoordinates, radius: u32, edit: &CellEdit) -> usize {
        shapes::hexagon(center.hex(), radius)
            .filter(|&hex| self.edit_cell(HexCoordinates::from(hex), edit))
            .count()
    }

    pub fn apply_edit(&mut self, id: CellId, edit: &CellEdit) {
        if let Some(color) = edit.color {
            self.set_color(id, color);
        }
        if let Some(elevation) = edit.elevation {
            self.set_elevation(id, elevation);
        }
        if let Some(water_level) = edit.water_level {
            self.set_water_level(id, water_level);
        }
        match edit.river {
            Some(RiverEdit::Outgoing(d)) => self.set_outgoing_river(id, d),
            Some(RiverEdit::Clear) => self.remove_river(id),
            None => {}
        }
        match edit.road {
            Some(RoadEdit::Add(d)) => self.add_road(id, d),
            Some(RoadEdit::Clear) => self.remove_roads(id),
            None => {}
        }
    }
}

fn validate(cfg: &MapConfig) -> Result<(), GridError> {
    let (g, m) = (&cfg.grid, &cfg.metrics);
    if g.chunk_count_x == 0 || g.chunk_count_z == 0 {
        return Err(GridError::EmptyGrid {
            x: g.chunk_count_x,
            z: g.chunk_count_z,
        });
    }
    if g.chunk_size_x == 0 || g.chunk_size_z == 0 {
        return Err(GridError::EmptyChunk {
            x: g.chunk_size_x,
            z: g.chunk_size_z,
        });
    }
    if m.outer_radius.is_nan() || m.outer_radius <= 0.0 {
        return Err(GridError::InvalidRadius(m.outer_radius));
    }
    if m.solid_factor.is_nan() || m.solid_factor <= 0.0 || m.solid_factor > 1.0 {
        return Err(GridError::InvalidSolidFactor(m.solid_factor));
    }
    if m.terraces_per_slope == 0 {
        return Err(GridError::NoTerraces);
    }
    if m.hash_grid_size == 0 {
        return Err(GridError::EmptyHashGrid);
    }
    Ok(())
}
