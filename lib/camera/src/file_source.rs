use crate::{CameraError, CameraResult};
use cutil::{
    artifact::{ImageArtifact, mime_for_extension},
    fs::{file_extension, file_name},
};
use image::RgbaImage;
use std::path::Path;

pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// A decoded user-selected image.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub raster: RgbaImage,
    pub artifact: ImageArtifact,
    pub preview: String,
}

/// Loads the first of `paths`; the rest are ignored.
///
/// Returns `Ok(None)` when the file passes the type check but cannot be read
/// or decoded.
pub fn select_files<P: AsRef<Path>>(paths: &[P]) -> CameraResult<Option<SelectedFile>> {
    let path = paths.first().ok_or(CameraError::NoInput)?.as_ref();
    if paths.len() > 1 {
        log::debug!("ignoring {} extra selected files", paths.len() - 1);
    }

    let ext = file_extension(path).unwrap_or_default();
    let mime = match mime_for_extension(&ext) {
        Some(mime) if SUPPORTED_EXTENSIONS.contains(&ext.as_str()) => mime,
        _ => return Err(CameraError::UnsupportedFormat(file_name(path))),
    };

    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("read {} failed: {e}", path.display());
            return Ok(None);
        }
    };

    let raster = match image::load_from_memory(&bytes) {
        Ok(img) => img.to_rgba8(),
        Err(e) => {
            log::warn!("decode {} failed: {e}", path.display());
            return Ok(None);
        }
    };

    let artifact = ImageArtifact::new(bytes, mime, file_name(path));
    let preview = artifact.to_data_uri();

    Ok(Some(SelectedFile {
        raster,
        artifact,
        preview,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_empty_selection() {
        let paths: [PathBuf; 0] = [];
        assert!(matches!(select_files(&paths), Err(CameraError::NoInput)));
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            select_files(&["anim.gif"]),
            Err(CameraError::UnsupportedFormat(name)) if name == "anim.gif"
        ));
        assert!(matches!(
            select_files(&["notes"]),
            Err(CameraError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_first_file_wins() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("Portrait.PNG");
        RgbaImage::from_pixel(5, 4, Rgba([1, 2, 3, 255]))
            .save_with_format(&first, image::ImageFormat::Png)
            .unwrap();

        let selected = select_files(&[first, dir.path().join("ignored.gif")])
            .unwrap()
            .unwrap();
        assert_eq!(selected.raster.dimensions(), (5, 4));
        assert_eq!(selected.artifact.mime(), "image/png");
        assert_eq!(selected.artifact.name(), "Portrait.PNG");
        assert!(selected.preview.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_undecodable_file_yields_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"not a jpeg").unwrap();

        assert!(select_files(&[&path]).unwrap().is_none());
        assert!(select_files(&[dir.path().join("missing.webp")]).unwrap().is_none());
    }
}
