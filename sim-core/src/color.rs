//! RGB color carried by each particle.

use crate::sampler::RandomSampler;
use rand::Rng;

/// Normalized RGB color, every channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);
    pub const CYAN: Color = Color::rgb(0.0, 1.0, 1.0);
    pub const PURPLE: Color = Color::rgb(1.0, 0.0, 1.0);

    const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from either normalized or 0–255 channels.
    ///
    /// If any channel is above `1`, all three are read as 0–255 values.
    /// The result is clamped to `[0, 1]`.
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        let (r, g, b) = if r > 1.0 || g > 1.0 || b > 1.0 {
            (r / 255.0, g / 255.0, b / 255.0)
        } else {
            (r, g, b)
        };
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
        }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// A random mid-range color that stays readable on dark and light
    /// backgrounds.
    pub fn random<R: Rng>(sampler: &mut RandomSampler<R>) -> Self {
        Self::rgb(
            sampler.uniform(0.15, 0.9) as f32,
            sampler.uniform(0.1, 0.9) as f32,
            sampler.uniform(0.2, 0.9) as f32,
        )
    }

    /// Channel-wise average of two colors, clamped to the valid range.
    pub fn blend(self, other: Color) -> Self {
        Self::rgb(
            ((self.r + other.r) / 2.0).clamp(0.0, 1.0),
            ((self.g + other.g) / 2.0).clamp(0.0, 1.0),
            ((self.b + other.b) / 2.0).clamp(0.0, 1.0),
        )
    }

    /// Complementary color (`1 - c` per channel).
    pub fn inverted(self) -> Self {
        Self::rgb(1.0 - self.r, 1.0 - self.g, 1.0 - self.b)
    }

    /// 8-bit RGBA, channels floored; `alpha` is in `[0, 1]`.
    pub fn to_rgba8(self, alpha: f64) -> [u8; 4] {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).floor() as u8;
        [
            channel(self.r),
            channel(self.g),
            channel(self.b),
            (alpha.clamp(0.0, 1.0) * 255.0).floor() as u8,
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}
