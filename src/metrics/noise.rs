use std::f64::consts::TAU;

use bevy::prelude::Vec4;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use crate::config::NoiseSettings;
use crate::math;

/// Source of the four perturbation channels, each in `[0, 1]`.
///
/// `u` and `v` are already scaled world coordinates; implementations tile.
pub trait NoiseSource: Send + Sync {
    fn sample(&self, u: f32, v: f32) -> Vec4;
}

/// Returns the same value everywhere.
///
/// [`ConstantNoise::NEUTRAL`] displaces nothing, which keeps geometry exact in tests.
#[derive(Clone, Copy, Debug)]
pub struct ConstantNoise(pub Vec4);

impl ConstantNoise {
    pub const NEUTRAL: Self = Self(Vec4::splat(0.5));
}

impl NoiseSource for ConstantNoise {
    fn sample(&self, _u: f32, _v: f32) -> Vec4 {
        self.0
    }
}

/// Tileable RGBA noise texture sampled bilinearly.
///
/// Each channel is an independent `Fbm<Perlin>` evaluated on a 4D torus so the
/// texture wraps seamlessly along both axes.
pub struct NoiseTexture {
    size: usize,
    texels: Vec<Vec4>,
}

impl NoiseTexture {
    /// Generates a `texture_size²` texture from the noise settings.
    pub fn from_settings(n: &NoiseSettings) -> Self {
        let size = n.texture_size.max(1) as usize;
        let channels: [Fbm<Perlin>; 4] = std::array::from_fn(|i| {
            Fbm::<Perlin>::new(n.seed.wrapping_add(i as u32))
                .set_octaves(n.octaves)
                .set_frequency(n.frequency)
        });

        let mut texels = Vec::with_capacity(size * size);
        for y in 0..size {
            let b = y as f64 / size as f64 * TAU;
            for x in 0..size {
                let a = x as f64 / size as f64 * TAU;
                let p = [a.cos(), a.sin(), b.cos(), b.sin()];
                let [r, g, bl, al] =
                    channels.each_ref().map(|fbm| math::map_noise_to_range(fbm.get(p), 0.0, 1.0).clamp(0.0, 1.0));
                texels.push(Vec4::new(r, g, bl, al));
            }
        }
        Self { size, texels }
    }

    fn texel(&self, x: i64, y: i64) -> Vec4 {
        let s = self.size as i64;
        self.texels[(x.rem_euclid(s) + y.rem_euclid(s) * s) as usize]
    }
}

impl NoiseSource for NoiseTexture {
    fn sample(&self, u: f32, v: f32) -> Vec4 {
        let x = u * self.size as f32 - 0.5;
        let y = v * self.size as f32 - 0.5;
        let (x0, y0) = (x.floor(), y.floor());
        let (tx, ty) = (x - x0, y - y0);
        let (x0, y0) = (x0 as i64, y0 as i64);

        let bottom = self.texel(x0, y0).lerp(self.texel(x0 + 1, y0), tx);
        let top = self.texel(x0, y0 + 1).lerp(self.texel(x0 + 1, y0 + 1), tx);
        bottom.lerp(top, ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_texture() -> NoiseTexture {
        NoiseTexture::from_settings(&NoiseSettings {
            seed: 5,
            octaves: 2,
            frequency: 2.0,
            texture_size: 16,
        })
    }

    #[test]
    fn channels_stay_in_unit_range() {
        let tex = small_texture();
        for t in &tex.texels {
            for c in t.to_array() {
                assert!((0.0..=1.0).contains(&c), "channel out of range: {c}");
            }
        }
    }

    #[test]
    fn sampling_tiles_seamlessly() {
        let tex = small_texture();
        for (u, v) in [(0.1, 0.7), (0.33, 0.01), (0.95, 0.5)] {
            let a = tex.sample(u, v);
            let b = tex.sample(u + 1.0, v - 2.0);
            assert!((a - b).length() < 1e-4);
        }
    }

    #[test]
    fn sample_at_texel_center_is_exact() {
        let tex = small_texture();
        let s = 16.0;
        let v = tex.sample(3.5 / s, 9.5 / s);
        assert!((v - tex.texel(3, 9)).length() < 1e-5);
    }

    #[test]
    fn constant_noise_ignores_coordinates() {
        let n = ConstantNoise(Vec4::new(0.1, 0.2, 0.3, 0.4));
        assert_eq!(n.sample(0.0, 0.0), n.sample(123.0, -4.0));
    }
}
