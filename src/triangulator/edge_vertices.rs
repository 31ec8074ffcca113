use bevy::prelude::Vec3;

use crate::metrics::HexMetrics;

/// Five points along one hex edge, `v1` and `v5` at the corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeVertices {
    pub v1: Vec3,
    pub v2: Vec3,
    pub v3: Vec3,
    pub v4: Vec3,
    pub v5: Vec3,
}

impl EdgeVertices {
    /// Evenly spaced points from `corner1` to `corner2`.
    pub fn new(corner1: Vec3, corner2: Vec3) -> Self {
        Self::with_outer_step(corner1, corner2, 0.25)
    }

    /// `v2` and `v4` sit `outer_step` away from their corners; `v3` stays centered.
    pub fn with_outer_step(corner1: Vec3, corner2: Vec3, outer_step: f32) -> Self {
        Self {
            v1: corner1,
            v2: corner1.lerp(corner2, outer_step),
            v3: corner1.lerp(corner2, 0.5),
            v4: corner1.lerp(corner2, 1.0 - outer_step),
            v5: corner2,
        }
    }

    /// Terrace cross section `step` between two parallel edges.
    pub fn terrace_lerp(a: &Self, b: &Self, step: u32, metrics: &HexMetrics) -> Self {
        Self {
            v1: metrics.terrace_lerp(a.v1, b.v1, step),
            v2: metrics.terrace_lerp(a.v2, b.v2, step),
            v3: metrics.terrace_lerp(a.v3, b.v3, step),
            v4: metrics.terrace_lerp(a.v4, b.v4, step),
            v5: metrics.terrace_lerp(a.v5, b.v5, step),
        }
    }

    pub fn points(&self) -> [Vec3; 5] {
        [self.v1, self.v2, self.v3, self.v4, self.v5]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_spacing_is_quarters() {
        let e = EdgeVertices::new(Vec3::ZERO, Vec3::new(8.0, 0.0, 0.0));
        let xs: Vec<f32> = e.points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn outer_step_pulls_inner_points_to_corners() {
        let e = EdgeVertices::with_outer_step(Vec3::ZERO, Vec3::new(6.0, 0.0, 0.0), 1.0 / 6.0);
        assert!((e.v2.x - 1.0).abs() < 1e-6);
        assert!((e.v3.x - 3.0).abs() < 1e-6);
        assert!((e.v4.x - 5.0).abs() < 1e-6);
    }
}
