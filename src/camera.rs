//! Overview camera over the map and the sun light.
//!
//! WASD pans over the ground plane, the mouse wheel zooms along the view axis.

mod entities;

pub use entities::OverviewCamera;

use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

use crate::config::MapConfig;
use crate::metrics::OUTER_TO_INNER;

/// Camera movement and lighting parameters.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct CameraConfig {
    /// Pan speed in world-units per second.
    pub move_speed: f32,
    /// Height change per scroll line.
    pub zoom_speed: f32,
    /// Lowest camera height.
    pub min_height: f32,
    /// Highest camera height.
    pub max_height: f32,
    /// Starting height above the map center.
    pub spawn_height: f32,
    /// Sun brightness in lux.
    pub sun_illuminance: f32,
    /// Background clear color.
    pub clear_color: Color,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            move_speed: 120.0,
            zoom_speed: 15.0,
            min_height: 20.0,
            max_height: 400.0,
            spawn_height: 160.0,
            sun_illuminance: 8_000.0,
            clear_color: Color::srgb(0.45, 0.55, 0.65),
        }
    }
}

/// Overview camera, sun and camera controls.
pub struct CameraPlugin(pub CameraConfig);

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<CameraConfig>()
            .register_type::<OverviewCamera>()
            .insert_resource(self.0.clone())
            .insert_resource(ClearColor(self.0.clear_color))
            .add_systems(Startup, spawn_camera)
            .add_systems(Update, move_camera);
    }
}

/// World-space center of the map, at ground level.
pub fn map_center(cfg: &MapConfig) -> Vec3 {
    let inner = cfg.metrics.outer_radius * OUTER_TO_INNER;
    let width = cfg.grid.cell_count_x() as f32 * 2.0 * inner;
    let depth = cfg.grid.cell_count_z() as f32 * 1.5 * cfg.metrics.outer_radius;
    Vec3::new(width * 0.5, 0.0, depth * 0.5)
}

fn spawn_camera(mut commands: Commands, cfg: Res<CameraConfig>, map: Res<MapConfig>) {
    let center = map_center(&map);
    commands.spawn((
        Name::new("Camera"),
        Camera3d::default(),
        Transform::from_translation(center + Vec3::new(0.0, cfg.spawn_height, cfg.spawn_height * 0.75))
            .looking_at(center, Vec3::Y),
        OverviewCamera,
    ));
    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            illuminance: cfg.sun_illuminance,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(0.0, 1.0, 0.0).looking_at(Vec3::new(-0.4, 0.0, -0.8), Vec3::Y),
    ));
}

fn move_camera(
    time: Res<Time>,
    keys: Res<ButtonInput<KeyCode>>,
    mut scroll: MessageReader<MouseWheel>,
    cfg: Res<CameraConfig>,
    mut query: Query<&mut Transform, With<OverviewCamera>>,
) {
    let Ok(mut transform) = query.single_mut() else {
        return;
    };

    // Pan in the ground plane, independent of the camera tilt
    let forward = transform.forward();
    let forward_xz = Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero();
    let right = transform.right();
    let right_xz = Vec3::new(right.x, 0.0, right.z).normalize_or_zero();

    let mut direction = Vec3::ZERO;
    if keys.pressed(KeyCode::KeyW) {
        direction += forward_xz;
    }
    if keys.pressed(KeyCode::KeyS) {
        direction -= forward_xz;
    }
    if keys.pressed(KeyCode::KeyD) {
        direction += right_xz;
    }
    if keys.pressed(KeyCode::KeyA) {
        direction -= right_xz;
    }
    if direction != Vec3::ZERO {
        transform.translation += direction.normalize() * cfg.move_speed * time.delta_secs();
    }

    let mut lines = 0.0;
    for ev in scroll.read() {
        lines += match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y / 40.0,
        };
    }
    if lines != 0.0 {
        let view = *transform.forward();
        // Move along the view axis; clamp by height so the camera keeps its angle.
        let target_y = (transform.translation.y - lines * cfg.zoom_speed)
            .clamp(cfg.min_height, cfg.max_height);
        if view.y.abs() > f32::EPSILON {
            let t = (target_y - transform.translation.y) / view.y;
            transform.translation += view * t;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_center_lies_inside_the_grid() {
        let cfg = MapConfig::default();
        let center = map_center(&cfg);
        let inner = cfg.metrics.outer_radius * OUTER_TO_INNER;
        assert!((center.x - 20.0 * inner).abs() < 1e-3);
        assert!((center.z - 15.0 * 1.5 * cfg.metrics.outer_radius * 0.5).abs() < 1e-2);
        assert_eq!(center.y, 0.0);
    }
}
