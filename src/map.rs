//! Hex map entities: one terrain mesh per tile plus a river child mesh.
//!
//! Edits mark tiles dirty during `Update`; [`systems::upload_dirty_tiles`]
//! rebuilds them in `PostUpdate` and writes the buffers into the tile meshes.

mod entities;
mod systems;

pub use entities::{HexMap, MapTile, RiverSurface, TileMeshHandles};

use bevy::prelude::*;

use crate::config::MapConfig;

/// Builds the grid at startup and keeps the tile meshes in sync with it.
pub struct MapPlugin(pub MapConfig);

impl Plugin for MapPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<MapConfig>()
            .register_type::<MapTile>()
            .register_type::<RiverSurface>()
            .insert_resource(self.0.clone())
            .add_systems(Startup, systems::generate_map)
            .add_systems(
                PostUpdate,
                systems::upload_dirty_tiles.run_if(any_with_component::<HexMap>),
            );
    }
}
