//! Brightness/contrast/saturation triple applied in one compositing pass.

use crate::{
    Effect, ImageEffectError, ImageEffectResult,
    base_effect::{BrightnessConfig, ChannelFilter, ContrastConfig, SaturationConfig},
    encode_png,
};
use cutil::artifact::ImageArtifact;
use derivative::Derivative;
use image::RgbaImage;
use std::path::Path;

pub const MIN_PERCENT: u16 = 0;
pub const MAX_PERCENT: u16 = 200;
pub const IDENTITY_PERCENT: u16 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustParam {
    Brightness,
    Contrast,
    Saturation,
}

impl AdjustParam {
    pub fn name(&self) -> &'static str {
        match self {
            AdjustParam::Brightness => "brightness",
            AdjustParam::Contrast => "contrast",
            AdjustParam::Saturation => "saturation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Derivative)]
#[derivative(Default)]
pub struct Adjustment {
    #[derivative(Default(value = "IDENTITY_PERCENT"))]
    brightness: u16,

    #[derivative(Default(value = "IDENTITY_PERCENT"))]
    contrast: u16,

    #[derivative(Default(value = "IDENTITY_PERCENT"))]
    saturation: u16,
}

impl Adjustment {
    pub fn new(brightness: u16, contrast: u16, saturation: u16) -> ImageEffectResult<Self> {
        Self::default()
            .with(AdjustParam::Brightness, brightness)?
            .with(AdjustParam::Contrast, contrast)?
            .with(AdjustParam::Saturation, saturation)
    }

    /// Returns a copy with one parameter replaced.
    ///
    /// # Errors
    /// Returns [`ImageEffectError::InvalidParameter`] when `percent > 200`.
    pub fn with(mut self, param: AdjustParam, percent: u16) -> ImageEffectResult<Self> {
        if percent > MAX_PERCENT {
            return Err(ImageEffectError::InvalidParameter(format!(
                "{} must be in [{MIN_PERCENT}, {MAX_PERCENT}], got {percent}",
                param.name()
            )));
        }

        match param {
            AdjustParam::Brightness => self.brightness = percent,
            AdjustParam::Contrast => self.contrast = percent,
            AdjustParam::Saturation => self.saturation = percent,
        }

        Ok(self)
    }

    pub fn get(&self, param: AdjustParam) -> u16 {
        match param {
            AdjustParam::Brightness => self.brightness,
            AdjustParam::Contrast => self.contrast,
            AdjustParam::Saturation => self.saturation,
        }
    }

    pub fn brightness(&self) -> u16 {
        self.brightness
    }

    pub fn contrast(&self) -> u16 {
        self.contrast
    }

    pub fn saturation(&self) -> u16 {
        self.saturation
    }

    /// Renders a filtered copy of `source` with identical dimensions.
    pub fn render(&self, source: &RgbaImage) -> ImageEffectResult<RgbaImage> {
        let mut output = source.clone();
        self.apply(&mut output)?;
        Ok(output)
    }

    /// Renders `source` and re-encodes it as a PNG artifact named after `source_name`.
    pub fn render_artifact(
        &self,
        source: &RgbaImage,
        source_name: &str,
    ) -> ImageEffectResult<ImageArtifact> {
        let output = self.render(source)?;
        let png = encode_png(&output)?;
        Ok(ImageArtifact::new(png, "image/png", png_name(source_name)))
    }
}

// Order matches CSS filter composition: brightness, contrast, saturate.
impl ChannelFilter for Adjustment {
    fn filter(&self, rgb: [f32; 3]) -> [f32; 3] {
        let brightness = BrightnessConfig::new().with_percent(self.brightness);
        let contrast = ContrastConfig::new().with_percent(self.contrast);
        let saturation = SaturationConfig::new().with_percent(self.saturation);

        let stages: [&dyn ChannelFilter; 3] = [&brightness, &contrast, &saturation];
        stages
            .into_iter()
            .filter(|stage| !stage.is_identity())
            .fold(rgb, |rgb, stage| stage.filter(rgb))
    }

    fn is_identity(&self) -> bool {
        self.brightness == IDENTITY_PERCENT
            && self.contrast == IDENTITY_PERCENT
            && self.saturation == IDENTITY_PERCENT
    }
}

fn png_name(source_name: &str) -> String {
    let stem = Path::new(source_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default();

    if stem.is_empty() {
        "image.png".to_string()
    } else {
        format!("{stem}.png")
    }
}
