use bevy::prelude::*;

use crate::cell::CellId;
use crate::coordinates::HexDirection;
use crate::grid::{CellEdit, HexGrid, RiverEdit, RoadEdit};

/// Three-way switch for features the brush can add, remove or leave alone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Reflect)]
pub enum OptionalToggle {
    #[default]
    Ignore,
    No,
    Yes,
}

/// A named brush color.
#[derive(Clone, Debug, Reflect)]
pub struct PaletteColor {
    pub name: String,
    pub color: LinearRgba,
}

impl PaletteColor {
    fn new(name: &str, color: LinearRgba) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

/// What the brush writes into every cell it touches.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct EditorSettings {
    pub palette: Vec<PaletteColor>,
    /// Index into `palette`; `None` leaves colors alone.
    pub active_color: Option<usize>,
    pub apply_elevation: bool,
    pub active_elevation: i32,
    pub apply_water_level: bool,
    pub active_water_level: i32,
    /// Brush radius in cells; zero edits a single cell.
    pub brush_size: u32,
    pub river_mode: OptionalToggle,
    pub road_mode: OptionalToggle,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            palette: vec![
                PaletteColor::new("Yellow", LinearRgba::rgb(0.9, 0.8, 0.2)),
                PaletteColor::new("Green", LinearRgba::rgb(0.2, 0.6, 0.15)),
                PaletteColor::new("Blue", LinearRgba::rgb(0.15, 0.3, 0.8)),
                PaletteColor::new("White", LinearRgba::WHITE),
            ],
            active_color: Some(0),
            apply_elevation: true,
            active_elevation: 0,
            apply_water_level: false,
            active_water_level: 0,
            brush_size: 0,
            river_mode: OptionalToggle::Ignore,
            road_mode: OptionalToggle::Ignore,
        }
    }
}

impl EditorSettings {
    /// Edit applied to each cell under the brush.
    ///
    /// `No` clears rivers or roads here; `Yes` only acts while dragging, see
    /// [`Self::drag_edit`].
    pub fn cell_edit(&self) -> CellEdit {
        CellEdit {
            color: self
                .active_color
                .and_then(|i| self.palette.get(i))
                .map(|p| p.color),
            elevation: self.apply_elevation.then_some(self.active_elevation),
            water_level: self.apply_water_level.then_some(self.active_water_level),
            river: (self.river_mode == OptionalToggle::No).then_some(RiverEdit::Clear),
            road: (self.road_mode == OptionalToggle::No).then_some(RoadEdit::Clear),
        }
    }

    /// Edit applied to the cell a drag came from, towards `direction`.
    pub fn drag_edit(&self, direction: HexDirection) -> Option<CellEdit> {
        let river = (self.river_mode == OptionalToggle::Yes).then_some(RiverEdit::Outgoing(direction));
        let road = (self.road_mode == OptionalToggle::Yes).then_some(RoadEdit::Add(direction));
        (river.is_some() || road.is_some()).then(|| CellEdit {
            river,
            road,
            ..default()
        })
    }
}

/// Cell under the cursor during the current mouse press.
#[derive(Resource, Default, Debug)]
pub struct BrushStroke {
    previous: Option<CellId>,
}

impl BrushStroke {
    /// Moves the stroke to `current`; returns the drag direction when it just
    /// crossed into a neighboring cell.
    pub fn advance(&mut self, grid: &HexGrid, current: CellId) -> Option<HexDirection> {
        let drag = self
            .previous
            .filter(|&previous| previous != current)
            .and_then(|previous| grid.direction_between(previous, current));
        self.previous = Some(current);
        drag
    }

    pub fn end(&mut self) {
        self.previous = None;
    }
}

/// `true` while egui uses the pointer, so clicks on the panel don't paint.
#[derive(Resource, Default)]
pub struct PointerOverUi(pub bool);
