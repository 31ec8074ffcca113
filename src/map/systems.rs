use bevy::asset::RenderAssetUsages;
use bevy::camera::visibility::NoFrustumCulling;
use bevy::mesh::Indices;
use bevy::prelude::*;
use bevy::render::render_resource::PrimitiveTopology;

use super::entities::{HexMap, MapTile, RiverSurface, TileMeshHandles};
use crate::config::MapConfig;
use crate::grid::HexGrid;
use crate::mesh_buffer::MeshBuffer;
use crate::metrics::{HexMetrics, NoiseTexture};

/// Builds the grid and spawns the [`HexMap`] with one [`MapTile`] per tile.
///
/// Meshes start empty; the first [`upload_dirty_tiles`] pass fills all of them.
pub fn generate_map(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    cfg: Res<MapConfig>,
) {
    let noise = NoiseTexture::from_settings(&cfg.noise);
    let grid = match HexGrid::new(&cfg, Box::new(noise)) {
        Ok(grid) => grid,
        Err(err) => {
            error!("cannot build hex map: {err}");
            return;
        }
    };

    let terrain_material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        perceptual_roughness: 0.9,
        ..default()
    });
    let river_material = materials.add(StandardMaterial {
        base_color: Color::srgba(0.15, 0.4, 0.85, 0.7),
        alpha_mode: AlphaMode::Blend,
        perceptual_roughness: 0.2,
        ..default()
    });

    let map = commands
        .spawn((Name::new("HexMap"), Transform::default(), Visibility::default()))
        .id();

    let tile_count = grid.chunks().chunk_count();
    let mut tiles = Vec::with_capacity(tile_count);
    for index in 0..tile_count {
        let handles = TileMeshHandles {
            terrain: meshes.add(terrain_mesh(&MeshBuffer::default(), grid.metrics())),
            rivers: meshes.add(river_mesh(&MeshBuffer::default())),
        };
        commands
            .spawn((
                Name::new(format!("Tile {index}")),
                MapTile { index },
                Mesh3d(handles.terrain.clone()),
                MeshMaterial3d(terrain_material.clone()),
                NoFrustumCulling,
                ChildOf(map),
            ))
            .with_child((
                Name::new("Rivers"),
                RiverSurface,
                Mesh3d(handles.rivers.clone()),
                MeshMaterial3d(river_material.clone()),
                NoFrustumCulling,
            ));
        tiles.push(handles);
    }

    info!("spawned hex map with {tile_count} tiles");
    commands.entity(map).insert(HexMap { grid, tiles });
}

/// Rebuilds every tile edited this frame and replaces its mesh data.
pub fn upload_dirty_tiles(mut maps: Query<&mut HexMap>, mut meshes: ResMut<Assets<Mesh>>) {
    let Ok(mut map) = maps.single_mut() else {
        return;
    };
    let HexMap { grid, tiles } = &mut *map;

    grid.triangulate_dirty(|index, buffers, metrics| {
        let Some(handles) = tiles.get(index) else {
            return;
        };
        if let Some(mesh) = meshes.get_mut(&handles.terrain) {
            *mesh = terrain_mesh(&buffers.terrain, metrics);
        }
        if let Some(mesh) = meshes.get_mut(&handles.rivers) {
            *mesh = river_mesh(&buffers.rivers);
        }
    });
}

fn terrain_mesh(buffer: &MeshBuffer, metrics: &HexMetrics) -> Mesh {
    let colors: Vec<[f32; 4]> = buffer
        .colors
        .iter()
        .zip(&buffer.positions)
        .map(|(&c, &p)| metrics.vary_color(c, p).to_f32_array())
        .collect();
    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, buffer.positions.clone())
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, buffer.normals())
        .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, colors)
        .with_inserted_indices(Indices::U32(buffer.indices.clone()))
}

fn river_mesh(buffer: &MeshBuffer) -> Mesh {
    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, buffer.positions.clone())
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, buffer.normals())
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, buffer.uvs.clone())
        .with_inserted_indices(Indices::U32(buffer.indices.clone()))
}
