use bevy::prelude::*;

use crate::grid::HexGrid;

/// Root entity of the map; owns the grid and the mesh handles of every tile.
#[derive(Component)]
pub struct HexMap {
    /// Cells, metrics and the dirty-tile schedule.
    pub grid: HexGrid,
    /// Mesh handles indexed by tile.
    pub tiles: Vec<TileMeshHandles>,
}

/// Assets a rebuilt tile is written into.
#[derive(Clone, Debug)]
pub struct TileMeshHandles {
    pub terrain: Handle<Mesh>,
    pub rivers: Handle<Mesh>,
}

/// Terrain entity of one tile. Child of the [`HexMap`].
#[derive(Component, Reflect)]
pub struct MapTile {
    /// Tile index, row-major.
    pub index: usize,
}

/// Marker for the water surface of a tile. Child of its [`MapTile`].
#[derive(Component, Reflect)]
pub struct RiverSurface;
