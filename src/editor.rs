//! Map editor: a brush driven by the mouse and an egui panel to configure it.
//!
//! Holding the left button paints [`EditorSettings::cell_edit`] into every
//! cell under the brush. Dragging from one cell into a neighbor additionally
//! starts rivers or roads on the cells the drag came from.

mod entities;
mod systems;

pub use entities::{BrushStroke, EditorSettings, OptionalToggle, PaletteColor, PointerOverUi};

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::GameState;
use crate::cell::CellId;
use crate::coordinates::HexDirection;
use crate::grid::HexGrid;

/// Brush editing and its settings panel, active in [`GameState::Editing`].
pub struct EditorPlugin;

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<EditorSettings>()
            .init_resource::<EditorSettings>()
            .init_resource::<BrushStroke>()
            .init_resource::<PointerOverUi>()
            .add_systems(
                EguiPrimaryContextPass,
                systems::editor_panel.run_if(in_state(GameState::Editing)),
            )
            .add_systems(
                Update,
                systems::paint_cells.run_if(in_state(GameState::Editing)),
            );
    }
}

/// Applies the brush centered on `center`. Returns the number of cells painted.
pub fn apply_brush(
    grid: &mut HexGrid,
    settings: &EditorSettings,
    center: CellId,
    drag: Option<HexDirection>,
) -> usize {
    let coordinates = grid.cell_by_id(center).coordinates();
    let painted = grid.edit_cells(coordinates, settings.brush_size, &settings.cell_edit());

    let Some(direction) = drag else {
        return painted;
    };
    let Some(edit) = settings.drag_edit(direction) else {
        return painted;
    };
    for hex in hexx::shapes::hexagon(coordinates.hex(), settings.brush_size) {
        let source = grid
            .cell(hex.into())
            .and_then(|cell| cell.neighbor(direction.opposite()));
        if let Some(source) = source {
            grid.apply_edit(source, &edit);
        }
    }
    painted
}

/// Cell hit by `ray`.
///
/// The ray is first cut with the ground plane, then re-cut at the height of
/// the cell found, which settles on elevated terrain after a few rounds.
pub fn pick_cell(grid: &HexGrid, ray: Ray3d) -> Option<CellId> {
    let mut height = 0.0;
    let mut picked = None;
    for _ in 0..3 {
        let distance = ray.intersect_plane(Vec3::Y * height, InfinitePlane3d::new(Vec3::Y))?;
        let id = grid.cell_at_position(ray.get_point(distance))?;
        if picked == Some(id) {
            break;
        }
        height = grid.cell_by_id(id).position().y;
        picked = Some(id);
    }
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapConfig;
    use crate::coordinates::HexCoordinates;
    use crate::grid::RiverEdit;
    use crate::metrics::ConstantNoise;

    fn grid() -> HexGrid {
        HexGrid::new(&MapConfig::default(), Box::new(ConstantNoise::NEUTRAL)).expect("valid config")
    }

    fn at(grid: &HexGrid, col: i32, row: i32) -> CellId {
        grid.cell_id(HexCoordinates::from_offset(col, row))
            .expect("cell inside grid")
    }

    // ── Settings ────────────────────────────────────────────────────

    #[test]
    fn ignored_toggles_leave_rivers_and_roads_alone() {
        let settings = EditorSettings::default();
        let edit = settings.cell_edit();
        assert_eq!(edit.river, None);
        assert_eq!(edit.road, None);
        assert_eq!(edit.elevation, Some(0));
        assert!(settings.drag_edit(HexDirection::E).is_none());
    }

    #[test]
    fn no_toggle_clears_and_yes_toggle_needs_a_drag() {
        let settings = EditorSettings {
            river_mode: OptionalToggle::No,
            road_mode: OptionalToggle::Yes,
            ..default()
        };
        assert_eq!(settings.cell_edit().river, Some(RiverEdit::Clear));
        assert_eq!(settings.cell_edit().road, None);
        let drag = settings.drag_edit(HexDirection::W).expect("road drag");
        assert_eq!(drag.river, None);
        assert!(drag.road.is_some());
    }

    #[test]
    fn missing_palette_entry_keeps_colors() {
        let settings = EditorSettings {
            active_color: Some(99),
            ..default()
        };
        assert_eq!(settings.cell_edit().color, None);
    }

    // ── Strokes ─────────────────────────────────────────────────────

    #[test]
    fn stroke_reports_drag_only_between_neighbors() {
        let g = grid();
        let mut stroke = BrushStroke::default();
        assert_eq!(stroke.advance(&g, at(&g, 3, 3)), None);
        assert_eq!(stroke.advance(&g, at(&g, 3, 3)), None);
        assert_eq!(stroke.advance(&g, at(&g, 4, 3)), Some(HexDirection::E));
        assert_eq!(stroke.advance(&g, at(&g, 8, 3)), None);
        stroke.end();
        assert_eq!(stroke.advance(&g, at(&g, 9, 3)), None);
    }

    #[test]
    fn dragging_with_rivers_on_starts_a_river() {
        let mut g = grid();
        let settings = EditorSettings {
            active_color: None,
            apply_elevation: false,
            river_mode: OptionalToggle::Yes,
            ..default()
        };
        let (from, to) = (at(&g, 3, 3), at(&g, 4, 3));
        let mut stroke = BrushStroke::default();
        stroke.advance(&g, from);
        let drag = stroke.advance(&g, to);

        assert_eq!(apply_brush(&mut g, &settings, to, drag), 1);
        assert_eq!(g.cell_by_id(from).outgoing_river(), Some(HexDirection::E));
        assert_eq!(g.cell_by_id(to).incoming_river(), Some(HexDirection::W));
    }

    #[test]
    fn brush_size_paints_a_hexagon() {
        let mut g = grid();
        let settings = EditorSettings {
            active_elevation: 2,
            brush_size: 2,
            ..default()
        };
        let center = at(&g, 10, 7);
        assert_eq!(apply_brush(&mut g, &settings, center, None), 19);
        let raised = g.cells().iter().filter(|c| c.elevation() == 2).count();
        assert_eq!(raised, 19);
    }

    // ── Picking ─────────────────────────────────────────────────────

    #[test]
    fn vertical_ray_picks_the_cell_below() {
        let mut g = grid();
        let target = at(&g, 6, 4);
        g.set_elevation(target, 3);

        let above = g.cell_by_id(target).position() + Vec3::new(1.0, 50.0, 1.0);
        let ray = Ray3d::new(above, Dir3::NEG_Y);
        assert_eq!(pick_cell(&g, ray), Some(target));
    }

    #[test]
    fn ray_missing_the_map_picks_nothing() {
        let g = grid();
        let ray = Ray3d::new(Vec3::new(-500.0, 50.0, -500.0), Dir3::NEG_Y);
        assert_eq!(pick_cell(&g, ray), None);
        let skyward = Ray3d::new(Vec3::new(20.0, 50.0, 20.0), Dir3::Y);
        assert_eq!(pick_cell(&g, skyward), None);
    }

    #[test]
    fn ray_grazing_the_horizon_picks_nothing() {
        let g = grid();
        let direction = Dir3::new(Vec3::new(0.0, -1.0e-6, 1.0)).expect("non-zero direction");
        let ray = Ray3d::new(Vec3::new(20.0, 50.0, 20.0), direction);
        assert_eq!(pick_cell(&g, ray), None);
    }
}
