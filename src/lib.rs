//! Editable hex map: a grid of cells with elevation, water, rivers and roads,
//! triangulated per tile into terraced, perturbed terrain meshes.
//!
//! The core ([`grid`], [`triangulator`], [`metrics`]) is plain data and
//! geometry; [`map`], [`editor`] and [`camera`] wire it into a Bevy app.

pub mod camera;
pub mod cell;
pub mod chunk;
pub mod config;
pub mod coordinates;
pub mod editor;
pub mod error;
pub mod grid;
pub mod map;
pub mod math;
pub mod mesh_buffer;
pub mod metrics;
pub mod triangulator;

use bevy::prelude::*;

/// Application-wide state, used for system scheduling.
#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash, Reflect)]
pub enum GameState {
    /// Mouse edits the map through the editor panel.
    #[default]
    Editing,
    /// World inspector open (Tab to toggle); map edits are paused.
    Inspecting,
}
