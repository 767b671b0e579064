pub mod adjustment;
pub mod base_effect;
pub mod stage;

pub use adjustment::{AdjustParam, Adjustment};
pub use stage::{AdjustStage, RenderTicket, Rendered};

use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

pub type ImageEffectResult<T> = Result<T, ImageEffectError>;

#[derive(thiserror::Error, Debug)]
pub enum ImageEffectError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("No source image")]
    NoSource,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub trait Effect {
    fn apply(&self, image: &mut RgbaImage) -> ImageEffectResult<()>;
}

/// Decodes any supported encoded image (png, jpeg, webp) into RGBA.
pub fn decode_rgba(bytes: &[u8]) -> ImageEffectResult<RgbaImage> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

/// Encodes an RGBA raster as PNG. The output is deterministic for a given raster.
pub fn encode_png(image: &RgbaImage) -> ImageEffectResult<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_png_roundtrip_is_lossless() {
        let mut img = RgbaImage::new(3, 2);
        img.put_pixel(0, 0, Rgba([1, 2, 3, 4]));
        img.put_pixel(2, 1, Rgba([250, 128, 0, 255]));

        let png = encode_png(&img).unwrap();
        assert_eq!(&png[1..4], b"PNG");
        assert_eq!(decode_rgba(&png).unwrap(), img);
    }

    #[test]
    fn test_decode_jpeg() {
        let rgb = image::RgbImage::from_pixel(8, 8, image::Rgb([120, 120, 120]));
        let mut buf = Cursor::new(Vec::new());
        rgb.write_to(&mut buf, ImageFormat::Jpeg).unwrap();

        let decoded = decode_rgba(buf.get_ref()).unwrap();
        assert_eq!(decoded.dimensions(), (8, 8));
        assert_eq!(decoded.get_pixel(4, 4)[3], 255);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(matches!(
            decode_rgba(b"definitely not an image"),
            Err(ImageEffectError::Image(_))
        ));
    }
}
