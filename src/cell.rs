//! Per-cell state stored in the grid arena.

use bevy::prelude::*;

use crate::coordinates::{HexCoordinates, HexDirection};
use crate::metrics::HexMetrics;

/// Elevation a cell holds before the grid assigns its first real value.
pub const UNSET_ELEVATION: i32 = i32::MIN;

/// Index of a cell in the grid arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub(crate) usize);

impl CellId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One hexagonal cell.
///
/// Fields are read-only from outside the crate; every mutation goes through
/// [`HexGrid`](crate::grid::HexGrid) so that neighbor symmetry, river and road
/// rules, and tile invalidation are kept consistent.
#[derive(Clone, Debug)]
pub struct HexCell {
    pub(crate) coordinates: HexCoordinates,
    pub(crate) elevation: i32,
    pub(crate) water_level: i32,
    pub(crate) color: LinearRgba,
    pub(crate) incoming_river: Option<HexDirection>,
    pub(crate) outgoing_river: Option<HexDirection>,
    pub(crate) roads: [bool; 6],
    pub(crate) neighbors: [Option<CellId>; 6],
    pub(crate) chunk: usize,
    pub(crate) position: Vec3,
}

impl HexCell {
    pub(crate) fn new(coordinates: HexCoordinates, position: Vec3, color: LinearRgba) -> Self {
        Self {
            coordinates,
            elevation: UNSET_ELEVATION,
            water_level: 0,
            color,
            incoming_river: None,
            outgoing_river: None,
            roads: [false; 6],
            neighbors: [None; 6],
            chunk: 0,
            position,
        }
    }

    pub fn coordinates(&self) -> HexCoordinates {
        self.coordinates
    }

    pub fn elevation(&self) -> i32 {
        self.elevation
    }

    pub fn water_level(&self) -> i32 {
        self.water_level
    }

    pub fn color(&self) -> LinearRgba {
        self.color
    }

    /// World-space center, including the elevation jitter.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Index of the tile that renders this cell.
    pub fn chunk(&self) -> usize {
        self.chunk
    }

    pub fn neighbor(&self, direction: HexDirection) -> Option<CellId> {
        self.neighbors[direction.index()]
    }

    pub fn is_underwater(&self) -> bool {
        self.water_level > self.elevation
    }

    // ── Rivers ──────────────────────────────────────────────────────

    pub fn incoming_river(&self) -> Option<HexDirection> {
        self.incoming_river
    }

    pub fn outgoing_river(&self) -> Option<HexDirection> {
        self.outgoing_river
    }

    pub fn has_river(&self) -> bool {
        self.incoming_river.is_some() || self.outgoing_river.is_some()
    }

    /// A river starts or ends here: exactly one of incoming/outgoing is set.
    pub fn has_river_begin_or_end(&self) -> bool {
        self.incoming_river.is_some() != self.outgoing_river.is_some()
    }

    pub fn has_river_through_edge(&self, direction: HexDirection) -> bool {
        self.incoming_river == Some(direction) || self.outgoing_river == Some(direction)
    }

    /// The single river edge of a source or sink cell.
    pub fn river_begin_or_end_direction(&self) -> Option<HexDirection> {
        match (self.incoming_river, self.outgoing_river) {
            (Some(d), None) | (None, Some(d)) => Some(d),
            _ => None,
        }
    }

    pub fn stream_bed_y(&self, metrics: &HexMetrics) -> f32 {
        metrics.stream_bed_y(self.elevation)
    }

    pub fn river_surface_y(&self, metrics: &HexMetrics) -> f32 {
        metrics.river_surface_y(self.elevation)
    }

    // ── Roads ───────────────────────────────────────────────────────

    pub fn has_road_through_edge(&self, direction: HexDirection) -> bool {
        self.roads[direction.index()]
    }

    pub fn has_roads(&self) -> bool {
        self.roads.iter().any(|&r| r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell() -> HexCell {
        HexCell::new(HexCoordinates::new(0, 0), Vec3::ZERO, LinearRgba::WHITE)
    }

    #[test]
    fn fresh_cell_has_sentinel_elevation_and_no_links() {
        let c = cell();
        assert_eq!(c.elevation(), UNSET_ELEVATION);
        assert!(c.neighbors.iter().all(Option::is_none));
        assert!(!c.has_river() && !c.has_roads());
    }

    #[test]
    fn river_begin_or_end_needs_exactly_one_side() {
        let mut c = cell();
        c.outgoing_river = Some(HexDirection::E);
        assert!(c.has_river_begin_or_end());
        assert_eq!(c.river_begin_or_end_direction(), Some(HexDirection::E));
        assert!(c.has_river_through_edge(HexDirection::E));
        assert!(!c.has_river_through_edge(HexDirection::W));

        c.incoming_river = Some(HexDirection::W);
        assert!(c.has_river());
        assert!(!c.has_river_begin_or_end());
        assert_eq!(c.river_begin_or_end_direction(), None);
    }

    #[test]
    fn underwater_when_water_above_ground() {
        let mut c = cell();
        c.elevation = 1;
        c.water_level = 1;
        assert!(!c.is_underwater());
        c.water_level = 2;
        assert!(c.is_underwater());
    }

    #[test]
    fn road_queries_follow_flags() {
        let mut c = cell();
        c.roads[HexDirection::SW.index()] = true;
        assert!(c.has_roads());
        assert!(c.has_road_through_edge(HexDirection::SW));
        assert!(!c.has_road_through_edge(HexDirection::NE));
    }
}
