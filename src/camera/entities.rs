use bevy::prelude::*;

/// Marker for the camera the editor picks cells through.
#[derive(Component, Reflect)]
pub struct OverviewCamera;
