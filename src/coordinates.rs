//! Cube coordinates and the six edge directions of a pointy-top hex grid.
//!
//! Cells are addressed by `(X, Z)` with an implicit `Y = -X - Z`. The grid is
//! stored row by row in offset coordinates `(col, row)`, where odd rows are
//! shifted half a cell to the right.

use std::fmt;

use bevy::prelude::{Reflect, Vec2, Vec3};
use hexx::{EdgeDirection, Hex, HexOrientation, OffsetHexMode};

use crate::metrics::HexMetrics;

/// One of the six edges of a pointy-top hex, clockwise starting north-east.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub enum HexDirection {
    /// North-east.
    NE,
    /// East.
    E,
    /// South-east.
    SE,
    /// South-west.
    SW,
    /// West.
    W,
    /// North-west.
    NW,
}

impl HexDirection {
    /// Canonical iteration order used by the triangulator.
    pub const ALL: [HexDirection; 6] = [Self::NE, Self::E, Self::SE, Self::SW, Self::W, Self::NW];

    /// Direction for `index` modulo 6.
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % 6]
    }

    /// Position in [`HexDirection::ALL`] (0..5).
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn opposite(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    pub const fn previous(self) -> Self {
        Self::from_index(self.index() + 5)
    }

    pub const fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub const fn previous2(self) -> Self {
        Self::from_index(self.index() + 4)
    }

    pub const fn next2(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    /// NE, E and SE: the directions whose shared edge a cell triangulates itself.
    pub const fn owns_connection(self) -> bool {
        matches!(self, Self::NE | Self::E | Self::SE)
    }

    /// NE and E: the directions whose trailing corner a cell triangulates itself.
    pub const fn owns_corner(self) -> bool {
        matches!(self, Self::NE | Self::E)
    }

    /// The hexx edge direction with the same cube offset.
    pub const fn edge(self) -> EdgeDirection {
        match self {
            Self::NE => EdgeDirection::Y,
            Self::E => EdgeDirection::X,
            Self::SE => EdgeDirection::X_NEG_Y,
            Self::SW => EdgeDirection::NEG_Y,
            Self::W => EdgeDirection::NEG_X,
            Self::NW => EdgeDirection::NEG_X_Y,
        }
    }
}

/// World positions further out than this many cells are never inside a grid.
const MAX_FRACTIONAL_COORDINATE: f32 = (1 << 20) as f32;

/// Cube coordinates of a cell. Stored as a [`Hex`] with `hex.x = X`, `hex.y = Z`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct HexCoordinates(Hex);

impl HexCoordinates {
    pub const fn new(x: i32, z: i32) -> Self {
        Self(Hex::new(x, z))
    }

    pub const fn from_hex(hex: Hex) -> Self {
        Self(hex)
    }

    pub const fn hex(self) -> Hex {
        self.0
    }

    pub const fn x(self) -> i32 {
        self.0.x
    }

    pub const fn y(self) -> i32 {
        -self.0.x - self.0.y
    }

    pub const fn z(self) -> i32 {
        self.0.y
    }

    /// Converts offset `(col, row)` to cube coordinates.
    pub const fn from_offset(col: i32, row: i32) -> Self {
        Self(Hex::from_offset_coordinates(
            [col, row],
            OffsetHexMode::Odd,
            HexOrientation::Pointy,
        ))
    }

    /// Inverse of [`HexCoordinates::from_offset`].
    pub const fn to_offset(self) -> (i32, i32) {
        let [col, row] = self
            .0
            .to_offset_coordinates(OffsetHexMode::Odd, HexOrientation::Pointy);
        (col, row)
    }

    /// Coordinates of the adjacent cell in `direction`.
    pub const fn neighbor(self, direction: HexDirection) -> Self {
        Self(self.0.neighbor(direction.edge()))
    }

    /// Number of cell steps between two coordinates.
    pub const fn distance_to(self, other: Self) -> u32 {
        self.0.unsigned_distance_to(other.0)
    }

    /// Cell containing the world-space point `position` (height is ignored).
    ///
    /// `None` for non-finite points and points too far out to round safely.
    pub fn from_position(position: Vec3, metrics: &HexMetrics) -> Option<Self> {
        let fract = metrics
            .layout()
            .world_pos_to_fract_hex(Vec2::new(position.x, position.z));
        if !fract.is_finite() || fract.abs().max_element() > MAX_FRACTIONAL_COORDINATE {
            return None;
        }
        Some(Self(Hex::round(fract.to_array())))
    }
}

impl From<Hex> for HexCoordinates {
    fn from(hex: Hex) -> Self {
        Self(hex)
    }
}

impl fmt::Display for HexCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x(), self.y(), self.z())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapConfig;
    use crate::metrics::ConstantNoise;

    fn metrics() -> HexMetrics {
        let cfg = MapConfig::default();
        HexMetrics::new(&cfg.metrics, Box::new(ConstantNoise::NEUTRAL), 0)
    }

    // ── HexDirection ────────────────────────────────────────────────

    #[test]
    fn opposite_is_an_involution() {
        for d in HexDirection::ALL {
            assert_eq!(d.opposite().opposite(), d);
            assert_ne!(d.opposite(), d);
        }
    }

    #[test]
    fn next_and_previous_wrap_around() {
        assert_eq!(HexDirection::NW.next(), HexDirection::NE);
        assert_eq!(HexDirection::NE.previous(), HexDirection::NW);
        assert_eq!(HexDirection::SW.next2(), HexDirection::NW);
        assert_eq!(HexDirection::E.previous2(), HexDirection::NW);
        for d in HexDirection::ALL {
            assert_eq!(d.next().previous(), d);
            assert_eq!(d.next2(), d.next().next());
            assert_eq!(d.previous2(), d.previous().previous());
        }
    }

    #[test]
    fn only_three_directions_own_connections() {
        let owned: Vec<_> = HexDirection::ALL
            .into_iter()
            .filter(|d| d.owns_connection())
            .collect();
        assert_eq!(owned, vec![HexDirection::NE, HexDirection::E, HexDirection::SE]);
    }

    // ── HexCoordinates ──────────────────────────────────────────────

    #[test]
    fn cube_components_sum_to_zero() {
        for row in -4..4 {
            for col in -4..4 {
                let c = HexCoordinates::from_offset(col, row);
                assert_eq!(c.x() + c.y() + c.z(), 0, "{c}");
            }
        }
    }

    #[test]
    fn offset_roundtrip_covers_whole_grid() {
        let (w, h) = (20, 15);
        for row in 0..h {
            for col in 0..w {
                let c = HexCoordinates::from_offset(col, row);
                assert_eq!(c.to_offset(), (col, row), "roundtrip failed for {c}");
            }
        }
    }

    #[test]
    fn neighbors_are_one_step_away() {
        let origin = HexCoordinates::new(3, -2);
        for d in HexDirection::ALL {
            let n = origin.neighbor(d);
            assert_eq!(origin.distance_to(n), 1);
            assert_eq!(n.neighbor(d.opposite()), origin);
        }
    }

    #[test]
    fn distance_counts_steps() {
        let a = HexCoordinates::new(0, 0);
        let b = HexCoordinates::new(3, -1);
        assert_eq!(a.distance_to(b), 3);
        assert_eq!(b.distance_to(a), 3);
        assert_eq!(a.distance_to(a), 0);
    }

    #[test]
    fn position_roundtrip_at_cell_centers() {
        let m = metrics();
        for row in 0..10 {
            for col in 0..10 {
                let c = HexCoordinates::from_offset(col, row);
                let center = m.cell_center(col, row);
                assert_eq!(HexCoordinates::from_position(center, &m), Some(c));
            }
        }
    }

    #[test]
    fn position_inside_solid_region_maps_to_cell() {
        let m = metrics();
        let center = m.cell_center(4, 3);
        for d in HexDirection::ALL {
            let p = center + m.first_solid_corner(d) * 0.9;
            assert_eq!(
                HexCoordinates::from_position(p, &m),
                Some(HexCoordinates::from_offset(4, 3)),
                "point towards {d:?} left the cell"
            );
        }
    }

    #[test]
    fn far_and_non_finite_positions_have_no_cell() {
        let m = metrics();
        assert_eq!(HexCoordinates::from_position(Vec3::new(0.0, 0.0, 1.0e12), &m), None);
        assert_eq!(HexCoordinates::from_position(Vec3::new(-3.0e30, 0.0, 3.0e30), &m), None);
        assert_eq!(HexCoordinates::from_position(Vec3::new(f32::NAN, 0.0, 0.0), &m), None);
        assert_eq!(HexCoordinates::from_position(Vec3::new(f32::INFINITY, 0.0, 0.0), &m), None);
    }

    #[test]
    fn directions_match_neighbor_offsets() {
        let origin = HexCoordinates::new(0, 0);
        assert_eq!(origin.neighbor(HexDirection::NE), HexCoordinates::new(0, 1));
        assert_eq!(origin.neighbor(HexDirection::E), HexCoordinates::new(1, 0));
        assert_eq!(origin.neighbor(HexDirection::SE), HexCoordinates::new(1, -1));
        assert_eq!(origin.neighbor(HexDirection::SW), HexCoordinates::new(0, -1));
        assert_eq!(origin.neighbor(HexDirection::W), HexCoordinates::new(-1, 0));
        assert_eq!(origin.neighbor(HexDirection::NW), HexCoordinates::new(-1, 1));
    }

    #[test]
    fn display_shows_all_three_components() {
        assert_eq!(HexCoordinates::new(2, -5).to_string(), "(2, 3, -5)");
    }
}
