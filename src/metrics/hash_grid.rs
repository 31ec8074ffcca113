use bevy::prelude::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Three independent pseudo-random values in `[0, 1)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HexHash {
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl HexHash {
    fn create(rng: &mut impl Rng) -> Self {
        Self {
            a: rng.gen_range(0.0..0.999),
            b: rng.gen_range(0.0..0.999),
            c: rng.gen_range(0.0..0.999),
        }
    }
}

/// Square table of [`HexHash`] values, tiled over the XZ plane.
pub struct HashGrid {
    size: usize,
    scale: f32,
    values: Vec<HexHash>,
}

impl HashGrid {
    /// Fills a `size × size` table from `seed`. A zero `size` is treated as one.
    pub fn new(seed: u64, size: u32, scale: f32) -> Self {
        let size = size.max(1) as usize;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let values = (0..size * size).map(|_| HexHash::create(&mut rng)).collect();
        Self {
            size,
            scale,
            values,
        }
    }

    /// Value covering `position`; wraps in both directions.
    pub fn sample(&self, position: Vec3) -> HexHash {
        let size = self.size as i64;
        let x = ((position.x * self.scale).floor() as i64).rem_euclid(size) as usize;
        let z = ((position.z * self.scale).floor() as i64).rem_euclid(size) as usize;
        self.values[x + z * self.size]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_table() {
        let a = HashGrid::new(7, 16, 0.25);
        let b = HashGrid::new(7, 16, 0.25);
        for x in 0..20 {
            let p = Vec3::new(x as f32 * 13.0, 0.0, x as f32 * -7.0);
            assert_eq!(a.sample(p), b.sample(p));
        }
    }

    #[test]
    fn sampling_wraps_around() {
        let grid = HashGrid::new(3, 8, 1.0);
        let p = Vec3::new(2.5, 0.0, 5.5);
        assert_eq!(grid.sample(p), grid.sample(p + Vec3::new(8.0, 0.0, -16.0)));
    }

    #[test]
    fn sampling_wraps_through_negative_coordinates() {
        let grid = HashGrid::new(3, 8, 1.0);
        assert_eq!(grid.sample(Vec3::new(-10.5, 0.0, 0.0)), grid.sample(Vec3::new(5.5, 0.0, 0.0)));
        assert_eq!(grid.sample(Vec3::new(0.5, 0.0, -0.5)), grid.sample(Vec3::new(0.5, 0.0, 7.5)));
        assert_eq!(grid.sample(Vec3::new(-0.5, 0.0, 0.0)), grid.values[7]);
    }

    #[test]
    fn values_stay_below_one() {
        let grid = HashGrid::new(99, 32, 1.0);
        for h in &grid.values {
            for v in [h.a, h.b, h.c] {
                assert!((0.0..1.0).contains(&v));
            }
        }
    }
}
