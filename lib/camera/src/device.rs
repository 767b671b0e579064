//! Capability seam over camera hardware.
//!
//! A [`MediaDevice`] hands out streams for a set of constraints and produces
//! RGBA frames for them. Builds without a camera backend get
//! [`UnsupportedDevice`].

use crate::{CameraError, CameraResult, FacingMode, QualityPreset};
use derivative::Derivative;
use derive_setters::Setters;
use image::RgbaImage;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamId(pub u64);

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stream-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct StreamConstraints {
    pub facing: FacingMode,

    #[derivative(Default(value = "1280"))]
    pub ideal_width: u32,

    #[derivative(Default(value = "720"))]
    pub ideal_height: u32,
}

impl StreamConstraints {
    pub fn new(facing: FacingMode, quality: QualityPreset) -> Self {
        let (ideal_width, ideal_height) = quality.resolution();
        Self {
            facing,
            ideal_width,
            ideal_height,
        }
    }
}

pub trait MediaDevice {
    /// Opens a stream. The resolution is a hint the device may not honour.
    fn acquire(&mut self, constraints: &StreamConstraints) -> CameraResult<StreamId>;

    /// Releases every track of the stream.
    fn release(&mut self, id: StreamId) -> CameraResult<()>;

    /// Latest frame of the stream at its native resolution.
    fn grab_frame(&mut self, id: StreamId) -> CameraResult<RgbaImage>;
}

/// Device for builds without a camera backend. Every stream request fails
/// with [`CameraError::Unsupported`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedDevice;

impl MediaDevice for UnsupportedDevice {
    fn acquire(&mut self, _constraints: &StreamConstraints) -> CameraResult<StreamId> {
        Err(CameraError::Unsupported)
    }

    fn release(&mut self, _id: StreamId) -> CameraResult<()> {
        Ok(())
    }

    fn grab_frame(&mut self, _id: StreamId) -> CameraResult<RgbaImage> {
        Err(CameraError::NotStreaming)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FacingMode, QualityPreset};

    #[test]
    fn test_unsupported_device() {
        let mut device = UnsupportedDevice;
        assert!(matches!(
            device.acquire(&StreamConstraints::new(FacingMode::User, QualityPreset::Low)),
            Err(CameraError::Unsupported)
        ));
        assert!(matches!(
            device.grab_frame(StreamId(1)),
            Err(CameraError::NotStreaming)
        ));
        assert!(device.release(StreamId(1)).is_ok());
    }

    #[test]
    fn test_constraints_from_quality() {
        let constraints = StreamConstraints::new(FacingMode::Environment, QualityPreset::High);
        assert_eq!(constraints.facing, FacingMode::Environment);
        assert_eq!((constraints.ideal_width, constraints.ideal_height), (1920, 1080));
        assert_eq!(StreamConstraints::default().ideal_width, 1280);
    }
}
