use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::{EguiContext, PrimaryEguiContext, egui};

use super::entities::{BrushStroke, EditorSettings, OptionalToggle, PointerOverUi};
use crate::camera::OverviewCamera;
use crate::map::HexMap;

/// Side panel with color, elevation, water, brush and river/road controls.
pub fn editor_panel(
    mut egui_ctx: Query<&mut EguiContext, With<PrimaryEguiContext>>,
    mut settings: ResMut<EditorSettings>,
    mut over_ui: ResMut<PointerOverUi>,
) {
    let Ok(mut ctx) = egui_ctx.single_mut() else {
        return;
    };
    let ctx = ctx.get_mut();
    let settings = &mut *settings;

    egui::SidePanel::left("editor")
        .resizable(false)
        .default_width(180.0)
        .show(ctx, |ui| {
            ui.heading("Color");
            ui.radio_value(&mut settings.active_color, None, "Keep");
            for (i, entry) in settings.palette.iter().enumerate() {
                ui.radio_value(&mut settings.active_color, Some(i), entry.name.as_str());
            }
            ui.separator();

            ui.checkbox(&mut settings.apply_elevation, "Elevation");
            ui.add_enabled(
                settings.apply_elevation,
                egui::Slider::new(&mut settings.active_elevation, 0..=6),
            );
            ui.checkbox(&mut settings.apply_water_level, "Water");
            ui.add_enabled(
                settings.apply_water_level,
                egui::Slider::new(&mut settings.active_water_level, 0..=6),
            );
            ui.separator();

            ui.label("Brush size");
            ui.add(egui::Slider::new(&mut settings.brush_size, 0..=4));
            ui.separator();

            toggle_row(ui, "River", &mut settings.river_mode);
            toggle_row(ui, "Road", &mut settings.road_mode);
        });

    over_ui.0 = ctx.is_pointer_over_area() || ctx.wants_pointer_input();
}

fn toggle_row(ui: &mut egui::Ui, label: &str, toggle: &mut OptionalToggle) {
    ui.label(label);
    ui.horizontal(|ui| {
        ui.radio_value(toggle, OptionalToggle::Ignore, "Ignore");
        ui.radio_value(toggle, OptionalToggle::No, "No");
        ui.radio_value(toggle, OptionalToggle::Yes, "Yes");
    });
}

/// Paints the brush under the cursor while the left button is held.
pub fn paint_cells(
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<OverviewCamera>>,
    mut maps: Query<&mut HexMap>,
    settings: Res<EditorSettings>,
    over_ui: Res<PointerOverUi>,
    mut stroke: ResMut<BrushStroke>,
) {
    if !mouse.pressed(MouseButton::Left) || over_ui.0 {
        stroke.end();
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        stroke.end();
        return;
    };
    let Ok((camera, cam_gt)) = cameras.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(cam_gt, cursor) else {
        return;
    };
    let Ok(mut map) = maps.single_mut() else {
        return;
    };

    let Some(center) = super::pick_cell(&map.grid, ray) else {
        stroke.end();
        return;
    };
    let drag = stroke.advance(&map.grid, center);
    let painted = super::apply_brush(&mut map.grid, &settings, center, drag);
    trace!(
        "painted {painted} cells around {}",
        map.grid.cell_by_id(center).coordinates()
    );
}
