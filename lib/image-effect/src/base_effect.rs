//! Per-channel colour filters with CSS `filter` semantics.
//!
//! Every filter takes a percentage where `100` is identity, `0` is the
//! minimum and `200` is the strongest supported boost.

use crate::{Effect, ImageEffectResult};
use derivative::Derivative;
use derive_setters::Setters;
use image::RgbaImage;

/// A colour transform on one pixel's RGB channels in `0.0..=255.0`.
pub trait ChannelFilter {
    fn filter(&self, rgb: [f32; 3]) -> [f32; 3];

    fn is_identity(&self) -> bool;
}

impl<F: ChannelFilter> Effect for F {
    fn apply(&self, image: &mut RgbaImage) -> ImageEffectResult<()> {
        if self.is_identity() {
            return Ok(());
        }

        for pixel in image.pixels_mut() {
            let rgb = self.filter([pixel[0] as f32, pixel[1] as f32, pixel[2] as f32]);
            for i in 0..3 {
                pixel[i] = to_channel(rgb[i]);
            }
        }

        Ok(())
    }
}

/// Rounds and clamps a filtered value back to an 8-bit channel.
pub(crate) fn to_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

fn clamp_rgb(rgb: [f32; 3]) -> [f32; 3] {
    rgb.map(|c| c.clamp(0.0, 255.0))
}

/// Brightness: `c' = c * percent / 100`
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct BrightnessConfig {
    #[derivative(Default(value = "100"))]
    pub percent: u16,
}

impl BrightnessConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChannelFilter for BrightnessConfig {
    fn filter(&self, rgb: [f32; 3]) -> [f32; 3] {
        let k = self.percent as f32 / 100.0;
        clamp_rgb(rgb.map(|c| c * k))
    }

    fn is_identity(&self) -> bool {
        self.percent == 100
    }
}

/// Contrast around mid-grey: `c' = (c - 127.5) * percent / 100 + 127.5`
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct ContrastConfig {
    #[derivative(Default(value = "100"))]
    pub percent: u16,
}

impl ContrastConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChannelFilter for ContrastConfig {
    fn filter(&self, rgb: [f32; 3]) -> [f32; 3] {
        let k = self.percent as f32 / 100.0;
        clamp_rgb(rgb.map(|c| (c - 127.5) * k + 127.5))
    }

    fn is_identity(&self) -> bool {
        self.percent == 100
    }
}

/// Saturation using the `saturate()` colour matrix of the CSS filter effects.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct SaturationConfig {
    #[derivative(Default(value = "100"))]
    pub percent: u16,
}

impl SaturationConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChannelFilter for SaturationConfig {
    fn filter(&self, rgb: [f32; 3]) -> [f32; 3] {
        let s = self.percent as f32 / 100.0;
        let [r, g, b] = rgb;

        clamp_rgb([
            (0.213 + 0.787 * s) * r + (0.715 - 0.715 * s) * g + (0.072 - 0.072 * s) * b,
            (0.213 - 0.213 * s) * r + (0.715 + 0.285 * s) * g + (0.072 - 0.072 * s) * b,
            (0.213 - 0.213 * s) * r + (0.715 - 0.715 * s) * g + (0.072 + 0.928 * s) * b,
        ])
    }

    fn is_identity(&self) -> bool {
        self.percent == 100
    }
}
