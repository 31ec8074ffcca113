#![warn(missing_docs)]
//! Hex map editor.
//!
//! Paint elevation, water, colors, rivers and roads onto a hex grid; edited
//! tiles are re-triangulated at the end of the frame.

use bevy::app::AppExit;
use bevy::prelude::*;
use bevy_inspector_egui::quick::WorldInspectorPlugin;
#[cfg(feature = "native")]
use clap::Parser;

use hex_map::GameState;
use hex_map::camera::{CameraConfig, CameraPlugin};
use hex_map::config::MapConfig;
use hex_map::editor::EditorPlugin;
use hex_map::map::MapPlugin;

/// Command-line overrides for the default map configuration.
#[cfg(feature = "native")]
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Tiles along X.
    #[arg(long)]
    chunks_x: Option<u32>,
    /// Tiles along Z.
    #[arg(long)]
    chunks_z: Option<u32>,
    /// Seed of the per-grid hash table.
    #[arg(long)]
    seed: Option<u64>,
    /// Seed of the perturbation noise.
    #[arg(long)]
    noise_seed: Option<u32>,
    /// Flat ledges per one-level slope.
    #[arg(long)]
    terraces: Option<u32>,
}

#[cfg(feature = "native")]
impl Cli {
    fn apply(self, cfg: &mut MapConfig) {
        if let Some(x) = self.chunks_x {
            cfg.grid.chunk_count_x = x;
        }
        if let Some(z) = self.chunks_z {
            cfg.grid.chunk_count_z = z;
        }
        if let Some(seed) = self.seed {
            cfg.grid.hash_seed = seed;
        }
        if let Some(seed) = self.noise_seed {
            cfg.noise.seed = seed;
        }
        if let Some(terraces) = self.terraces {
            cfg.metrics.terraces_per_slope = terraces;
        }
    }
}

fn main() {
    #[allow(unused_mut)]
    let mut map_config = MapConfig::default();
    #[cfg(feature = "native")]
    Cli::parse().apply(&mut map_config);

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Hex Map".into(),
            ..default()
        }),
        ..default()
    }))
    .register_type::<GameState>()
    .init_state::<GameState>()
    .add_plugins(bevy_egui::EguiPlugin::default())
    .add_plugins(MapPlugin(map_config))
    .add_plugins(CameraPlugin(CameraConfig::default()))
    .add_plugins(EditorPlugin)
    .add_systems(Update, exit_on_esc)
    .add_systems(Update, toggle_inspector)
    .add_plugins(WorldInspectorPlugin::new().run_if(in_state(GameState::Inspecting)));

    app.run();
}

fn toggle_inspector(
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<State<GameState>>,
    mut next: ResMut<NextState<GameState>>,
) {
    if keys.just_pressed(KeyCode::Tab) {
        next.set(match state.get() {
            GameState::Editing => GameState::Inspecting,
            GameState::Inspecting => GameState::Editing,
        });
    }
}

fn exit_on_esc(keys: Res<ButtonInput<KeyCode>>, mut exit: MessageWriter<AppExit>) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}
