//! Adjustment stage: owns the latest raw image and the current [`Adjustment`].
//!
//! Every change bumps a generation counter. A [`RenderTicket`] remembers the
//! generation it was issued for, and [`AdjustStage::commit`] drops renders
//! whose generation is no longer current, so an older render can never
//! replace the result for a newer source or newer parameters.

use crate::{AdjustParam, Adjustment, ImageEffectError, ImageEffectResult};
use cutil::artifact::ImageArtifact;
use image::RgbaImage;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct AdjustStage {
    source: Option<Arc<RgbaImage>>,
    source_name: String,
    adjustment: Adjustment,
    generation: u64,
}

/// A pending render of one (source, adjustment) pair.
#[derive(Debug, Clone)]
pub struct RenderTicket {
    generation: u64,
    source: Arc<RgbaImage>,
    source_name: String,
    adjustment: Adjustment,
}

#[derive(Debug, Clone)]
pub struct Rendered {
    generation: u64,
    artifact: ImageArtifact,
}

impl RenderTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn adjustment(&self) -> Adjustment {
        self.adjustment
    }

    /// Pure render; safe to run off the controller thread.
    pub fn render(self) -> ImageEffectResult<Rendered> {
        let artifact = self
            .adjustment
            .render_artifact(&self.source, &self.source_name)?;

        Ok(Rendered {
            generation: self.generation,
            artifact,
        })
    }
}

impl Rendered {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn artifact(&self) -> &ImageArtifact {
        &self.artifact
    }
}

impl AdjustStage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the raw image and resets the adjustment to identity.
    pub fn set_source(&mut self, image: RgbaImage, name: impl Into<String>) {
        self.source = Some(Arc::new(image));
        self.source_name = name.into();
        self.adjustment = Adjustment::default();
        self.generation += 1;
    }

    pub fn clear(&mut self) {
        self.source = None;
        self.source_name.clear();
        self.adjustment = Adjustment::default();
        self.generation += 1;
    }

    pub fn adjustment(&self) -> Adjustment {
        self.adjustment
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Changes one parameter and returns the render it requires.
    ///
    /// # Errors
    /// [`ImageEffectError::NoSource`] without a raw image, or
    /// [`ImageEffectError::InvalidParameter`] for an out-of-range value. The
    /// stage is unchanged on error.
    pub fn adjust(&mut self, param: AdjustParam, percent: u16) -> ImageEffectResult<RenderTicket> {
        if self.source.is_none() {
            return Err(ImageEffectError::NoSource);
        }

        self.adjustment = self.adjustment.with(param, percent)?;
        self.generation += 1;
        self.ticket().ok_or(ImageEffectError::NoSource)
    }

    /// Restores all three parameters to 100 in one step.
    pub fn reset(&mut self) -> Option<RenderTicket> {
        self.adjustment = Adjustment::default();
        self.generation += 1;
        self.ticket()
    }

    /// Ticket for the current state, if there is a source.
    pub fn ticket(&self) -> Option<RenderTicket> {
        self.source.as_ref().map(|source| RenderTicket {
            generation: self.generation,
            source: source.clone(),
            source_name: self.source_name.clone(),
            adjustment: self.adjustment,
        })
    }

    /// Accepts a render only if nothing changed since its ticket was issued.
    pub fn commit(&self, rendered: Rendered) -> Option<ImageArtifact> {
        if rendered.generation != self.generation {
            log::debug!(
                "drop stale render: generation {} != {}",
                rendered.generation,
                self.generation
            );
            return None;
        }

        Some(rendered.artifact)
    }

    /// Adjusts, renders and commits in one synchronous step.
    pub fn apply(&mut self, param: AdjustParam, percent: u16) -> ImageEffectResult<ImageArtifact> {
        let rendered = self.adjust(param, percent)?.render()?;
        self.commit(rendered).ok_or(ImageEffectError::NoSource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode_rgba;
    use image::Rgba;

    fn solid(rgba: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(4, 3, Rgba(rgba))
    }

    #[test]
    fn test_adjust_without_source() {
        let mut stage = AdjustStage::new();
        assert!(matches!(
            stage.adjust(AdjustParam::Brightness, 120),
            Err(ImageEffectError::NoSource)
        ));
        assert!(stage.reset().is_none());
    }

    #[test]
    fn test_new_source_resets_adjustment() {
        let mut stage = AdjustStage::new();
        stage.set_source(solid([10, 20, 30, 255]), "a.png");
        stage.apply(AdjustParam::Saturation, 150).unwrap();
        assert_eq!(stage.adjustment().saturation(), 150);

        stage.set_source(solid([40, 50, 60, 255]), "b.png");
        assert_eq!(stage.adjustment(), Adjustment::default());
    }

    #[test]
    fn test_stale_render_is_dropped() {
        let mut stage = AdjustStage::new();
        stage.set_source(solid([200, 0, 0, 255]), "first.png");
        let stale = stage.adjust(AdjustParam::Brightness, 50).unwrap();

        stage.set_source(solid([0, 0, 200, 255]), "second.png");
        let fresh = stage.adjust(AdjustParam::Brightness, 50).unwrap();

        assert!(stage.commit(stale.render().unwrap()).is_none());

        let artifact = stage.commit(fresh.render().unwrap()).unwrap();
        assert_eq!(artifact.name(), "second.png");
        let pixels = decode_rgba(artifact.bytes()).unwrap();
        assert_eq!(pixels.get_pixel(0, 0), &Rgba([0, 0, 100, 255]));
    }

    #[test]
    fn test_superseded_parameters_are_dropped() {
        let mut stage = AdjustStage::new();
        stage.set_source(solid([100, 100, 100, 255]), "a.png");
        let first = stage.adjust(AdjustParam::Contrast, 10).unwrap();
        let second = stage.adjust(AdjustParam::Contrast, 20).unwrap();

        assert!(stage.commit(first.render().unwrap()).is_none());
        assert!(stage.commit(second.render().unwrap()).is_some());
    }

    #[test]
    fn test_invalid_value_leaves_stage_untouched() {
        let mut stage = AdjustStage::new();
        stage.set_source(solid([1, 2, 3, 4]), "a.png");
        let generation = stage.generation();

        assert!(stage.adjust(AdjustParam::Contrast, 250).is_err());
        assert_eq!(stage.generation(), generation);
        assert_eq!(stage.adjustment(), Adjustment::default());
    }

    #[test]
    fn test_reset_after_adjust_is_pixel_identical() {
        let src = RgbaImage::from_fn(8, 8, |x, y| Rgba([x as u8 * 30, y as u8 * 30, 77, 255]));
        let mut stage = AdjustStage::new();
        stage.set_source(src.clone(), "grid.png");
        stage.apply(AdjustParam::Brightness, 180).unwrap();
        stage.apply(AdjustParam::Saturation, 0).unwrap();

        let rendered = stage.reset().unwrap().render().unwrap();
        let artifact = stage.commit(rendered).unwrap();
        assert_eq!(decode_rgba(artifact.bytes()).unwrap(), src);
    }
}
