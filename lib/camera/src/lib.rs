pub mod camera_client;
pub mod camera_info;
pub mod capture_session;
pub mod device;
pub mod file_source;

#[cfg(feature = "native")]
pub mod native;

#[cfg(any(test, feature = "synthetic"))]
pub mod synthetic;

pub use camera_client::CameraClient;
pub use camera_info::{FacingMode, QualityPreset};
pub use capture_session::{CaptureSession, CaptureState, CapturedImage};
pub use device::{MediaDevice, StreamConstraints, StreamId, UnsupportedDevice};
pub use file_source::{SUPPORTED_EXTENSIONS, SelectedFile, select_files};
pub use image::{Rgba, RgbaImage};

#[cfg(feature = "native")]
pub use native::NativeDevice;

#[cfg(any(test, feature = "synthetic"))]
pub use synthetic::{DeviceFailure, SyntheticDevice};

pub type CameraResult<T> = Result<T, CameraError>;

#[derive(thiserror::Error, Debug)]
pub enum CameraError {
    #[error("Camera permission denied. Allow camera access and try again")]
    PermissionDenied,

    #[error("No camera found on this device")]
    NotFound,

    #[error("Camera is already in use by another application")]
    Busy,

    #[error("Camera is not supported on this device")]
    Unsupported,

    #[error("No file selected")]
    NoInput,

    #[error("Unsupported file type `{0}`. Choose a PNG, JPEG or WebP image")]
    UnsupportedFormat(String),

    #[error("Camera is not streaming")]
    NotStreaming,

    #[error("No frame available")]
    NoFrameAvailable,

    #[error("Unknown capture: {0}")]
    UnknownCapture(String),

    #[error("Camera backend error: {0}")]
    Backend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl CameraError {
    /// Errors raised while opening a stream, as opposed to bad input.
    pub fn is_device_error(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied | Self::NotFound | Self::Busy | Self::Unsupported
        )
    }

    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::NoInput | Self::UnsupportedFormat(_))
    }
}

pub fn init() {
    #[cfg(all(feature = "native", target_os = "macos"))]
    nokhwa::nokhwa_initialize(|granted| {
        log::info!("User said {} for nokhwa", granted);
    });
}

pub fn rgb_to_rgba(rgb_image: &image::RgbImage) -> RgbaImage {
    let (width, height) = rgb_image.dimensions();
    RgbaImage::from_fn(width, height, |x, y| {
        let [r, g, b] = rgb_image.get_pixel(x, y).0;
        Rgba([r, g, b, 255])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        assert!(CameraError::Busy.is_device_error());
        assert!(!CameraError::Busy.is_input_error());
        assert!(CameraError::UnsupportedFormat("gif".into()).is_input_error());
        assert!(!CameraError::NotStreaming.is_device_error());
    }

    #[test]
    fn test_device_errors_have_distinct_messages() {
        let messages = [
            CameraError::PermissionDenied,
            CameraError::NotFound,
            CameraError::Busy,
            CameraError::Unsupported,
        ]
        .map(|e| e.to_string());

        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_rgb_to_rgba() {
        let rgb = image::RgbImage::from_pixel(2, 2, image::Rgb([9, 8, 7]));
        let rgba = rgb_to_rgba(&rgb);
        assert_eq!(rgba.get_pixel(1, 1), &Rgba([9, 8, 7, 255]));
    }
}
