use bevy::prelude::*;

use super::{EdgeVertices, Triangulator};
use crate::cell::HexCell;
use crate::coordinates::HexDirection;
use crate::metrics::INNER_TO_OUTER;

/// Shape of a river flowing through a cell, seen from one of its river edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Channel {
    /// The other river edge is the opposite one.
    Straight,
    /// The other river edge is the next one.
    SharpBendNext,
    /// The other river edge is the previous one.
    SharpBendPrevious,
    /// The other river edge is two steps ahead.
    GentleBendNext,
    /// The other river edge is two steps behind.
    GentleBendPrevious,
}

impl Channel {
    fn of(cell: &HexCell, direction: HexDirection) -> Self {
        if cell.has_river_through_edge(direction.opposite()) {
            Self::Straight
        } else if cell.has_river_through_edge(direction.next()) {
            Self::SharpBendNext
        } else if cell.has_river_through_edge(direction.previous()) {
            Self::SharpBendPrevious
        } else if cell.has_river_through_edge(direction.next2()) {
            Self::GentleBendNext
        } else {
            Self::GentleBendPrevious
        }
    }
}

impl<'a> Triangulator<'a> {
    /// Wedge of a cell the river passes through, on one of its two river edges.
    pub(super) fn triangulate_with_river(
        &mut self,
        direction: HexDirection,
        cell: &HexCell,
        center: Vec3,
        e: &EdgeVertices,
    ) {
        let m = self.metrics;
        let (center_l, center_r) = match Channel::of(cell, direction) {
            Channel::Straight => (
                center + m.first_solid_corner(direction.previous()) * 0.25,
                center + m.second_solid_corner(direction.next()) * 0.25,
            ),
            Channel::SharpBendNext => (center, center.lerp(e.v5, 2.0 / 3.0)),
            Channel::SharpBendPrevious => (center.lerp(e.v1, 2.0 / 3.0), center),
            Channel::GentleBendNext => (
                center,
                center + m.solid_edge_middle(direction.next()) * (0.5 * INNER_TO_OUTER),
            ),
            Channel::GentleBendPrevious => (
                center + m.solid_edge_middle(direction.previous()) * (0.5 * INNER_TO_OUTER),
                center,
            ),
        };
        let mut center = center_l.lerp(center_r, 0.5);

        let mut mid = EdgeVertices::with_outer_step(
            center_l.lerp(e.v1, 0.5),
            center_r.lerp(e.v5, 0.5),
            1.0 / 6.0,
        );
        mid.v3.y = e.v3.y;
        center.y = e.v3.y;

        let color = cell.color;
        self.triangulate_edge_strip(&mid, color, e, color);

        self.add_terrain_triangle(center_l, mid.v1, mid.v2);
        self.meshes.terrain.add_triangle_color(color);
        self.add_terrain_quad(center_l, center, mid.v2, mid.v3);
        self.meshes.terrain.add_quad_color(color);
        self.add_terrain_quad(center, center_r, mid.v3, mid.v4);
        self.meshes.terrain.add_quad_color(color);
        self.add_terrain_triangle(center_r, mid.v4, mid.v5);
        self.meshes.terrain.add_triangle_color(color);

        let surface = cell.river_surface_y(m);
        let reversed = cell.incoming_river == Some(direction);
        self.triangulate_river_quad([center_l, center_r, mid.v2, mid.v4], surface, surface, 0.4, reversed);
        self.triangulate_river_quad([mid.v2, mid.v4, e.v2, e.v4], surface, surface, 0.6, reversed);
    }

    /// Wedge of a source or sink cell facing its only river edge.
    pub(super) fn triangulate_with_river_begin_or_end(
        &mut self,
        cell: &HexCell,
        center: Vec3,
        e: &EdgeVertices,
    ) {
        let m = self.metrics;
        let mut mid = EdgeVertices::new(center.lerp(e.v1, 0.5), center.lerp(e.v5, 0.5));
        mid.v3.y = e.v3.y;

        self.triangulate_edge_strip(&mid, cell.color, e, cell.color);
        self.triangulate_edge_fan(center, &mid, cell.color);

        let surface = cell.river_surface_y(m);
        let reversed = cell.incoming_river.is_some();
        self.triangulate_river_quad([mid.v2, mid.v4, e.v2, e.v4], surface, surface, 0.6, reversed);

        let tip = center.with_y(surface);
        let v2 = mid.v2.with_y(surface);
        let v4 = mid.v4.with_y(surface);
        self.meshes
            .rivers
            .add_triangle_unperturbed(m.perturb(tip), m.perturb(v2), m.perturb(v4));
        if reversed {
            self.meshes.rivers.add_triangle_uv(
                Vec2::new(0.5, 0.4),
                Vec2::new(1.0, 0.2),
                Vec2::new(0.0, 0.2),
            );
        } else {
            self.meshes.rivers.add_triangle_uv(
                Vec2::new(0.5, 0.4),
                Vec2::new(0.0, 0.6),
                Vec2::new(1.0, 0.6),
            );
        }
    }

    /// Wedge of a river cell whose edge carries no river: the center shifts
    /// away from the channel so the banks stay clear of the water.
    pub(super) fn triangulate_adjacent_to_river(
        &mut self,
        direction: HexDirection,
        cell: &HexCell,
        center: Vec3,
        e: &EdgeVertices,
    ) {
        let center = center + self.river_bank_offset(direction, cell);
        let mid = EdgeVertices::new(center.lerp(e.v1, 0.5), center.lerp(e.v5, 0.5));
        self.triangulate_edge_strip(&mid, cell.color, e, cell.color);
        self.triangulate_edge_fan(center, &mid, cell.color);
    }

    /// Center shift for a wedge next to the river.
    ///
    /// A river through both `previous` and `previous2` (with `next` dry) leaves
    /// the center where it is; that wedge sits on the outside of a bend.
    fn river_bank_offset(&self, direction: HexDirection, cell: &HexCell) -> Vec3 {
        let m = self.metrics;
        if cell.has_river_through_edge(direction.next()) {
            if cell.has_river_through_edge(direction.previous()) {
                m.solid_edge_middle(direction) * (INNER_TO_OUTER * 0.5)
            } else if cell.has_river_through_edge(direction.previous2()) {
                m.first_solid_corner(direction) * 0.25
            } else {
                Vec3::ZERO
            }
        } else if cell.has_river_through_edge(direction.previous())
            && cell.has_river_through_edge(direction.next2())
        {
            m.second_solid_corner(direction) * 0.25
        } else {
            Vec3::ZERO
        }
    }

    /// River surface quad; `y1` applies to the near pair, `y2` to the far pair.
    ///
    /// `v` is where this quad starts along the flow; reversed quads flip both
    /// axes so the texture always runs downstream.
    pub(super) fn triangulate_river_quad(
        &mut self,
        [v1, v2, v3, v4]: [Vec3; 4],
        y1: f32,
        y2: f32,
        v: f32,
        reversed: bool,
    ) {
        let m = self.metrics;
        self.meshes.rivers.add_quad_unperturbed(
            m.perturb(v1.with_y(y1)),
            m.perturb(v2.with_y(y1)),
            m.perturb(v3.with_y(y2)),
            m.perturb(v4.with_y(y2)),
        );
        if reversed {
            self.meshes.rivers.add_quad_uv_rect(1.0, 0.0, 0.8 - v, 0.6 - v);
        } else {
            self.meshes.rivers.add_quad_uv_rect(0.0, 1.0, v, v + 0.2);
        }
    }
}
