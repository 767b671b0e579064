//! Multi-shot camera session with an ephemeral gallery.
//!
//! ```text
//! Idle -> Streaming -> Streaming (capture) | Idle | GallerySelection
//! GallerySelection -> Idle (pick, clear, or last entry deleted)
//! ```

use crate::{
    CameraClient, CameraError, CameraResult, FacingMode, MediaDevice, QualityPreset,
    StreamConstraints,
};
use cutil::artifact::ImageArtifact;
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    Streaming,
    GallerySelection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    pub id: String,
    pub artifact: ImageArtifact,
    pub preview: String,
}

impl CapturedImage {
    fn from_frame(frame: &RgbaImage) -> CameraResult<Self> {
        let mut buf = Cursor::new(Vec::new());
        frame.write_to(&mut buf, ImageFormat::Png)?;

        let id = uuid::Uuid::new_v4().to_string();
        let artifact = ImageArtifact::new(buf.into_inner(), "image/png", format!("capture-{id}.png"));
        let preview = artifact.to_data_uri();

        Ok(Self {
            id,
            artifact,
            preview,
        })
    }
}

pub struct CaptureSession<D: MediaDevice> {
    client: CameraClient<D>,
    gallery: Vec<CapturedImage>,
    selected: Option<String>,
    state: CaptureState,
}

impl<D: MediaDevice> CaptureSession<D> {
    pub fn new(device: D) -> Self {
        Self {
            client: CameraClient::new(device),
            gallery: Vec::new(),
            selected: None,
            state: CaptureState::Idle,
        }
    }

    pub fn start_camera(&mut self, facing: FacingMode, quality: QualityPreset) -> CameraResult<()> {
        let result = self.client.start(StreamConstraints::new(facing, quality));
        self.state = match &result {
            Ok(_) => CaptureState::Streaming,
            Err(_) => self.resting_state(),
        };
        result
    }

    /// Applies new settings to a live stream. Returns whether it restarted.
    pub fn restart(&mut self, facing: FacingMode, quality: QualityPreset) -> CameraResult<bool> {
        if self.state != CaptureState::Streaming {
            return Ok(false);
        }

        match self.client.restart(StreamConstraints::new(facing, quality)) {
            Ok(restarted) => Ok(restarted),
            Err(e) => {
                self.state = self.resting_state();
                Err(e)
            }
        }
    }

    pub fn stop_camera(&mut self) {
        self.client.stop();
        if self.state == CaptureState::Streaming {
            self.state = self.resting_state();
        }
    }

    /// Snapshots the current frame at native resolution into the gallery.
    pub fn capture_photo(&mut self) -> CameraResult<CapturedImage> {
        if self.state != CaptureState::Streaming {
            return Err(CameraError::NotStreaming);
        }

        let frame = self.client.last_frame()?;
        let captured = CapturedImage::from_frame(&frame)?;
        log::info!(
            "captured {} ({}x{}, {} bytes)",
            captured.id,
            frame.width(),
            frame.height(),
            captured.artifact.len()
        );

        self.gallery.push(captured.clone());
        Ok(captured)
    }

    /// Picks a gallery entry. Ends the capture loop.
    pub fn select_captured(&mut self, id: &str) -> CameraResult<CapturedImage> {
        let captured = self
            .find(id)
            .cloned()
            .ok_or_else(|| CameraError::UnknownCapture(id.to_string()))?;

        self.client.stop();
        self.selected = Some(captured.id.clone());
        self.state = CaptureState::Idle;
        Ok(captured)
    }

    /// Removes a gallery entry. Returns `true` if it was the selected one.
    pub fn delete_captured(&mut self, id: &str) -> CameraResult<bool> {
        let index = self
            .gallery
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| CameraError::UnknownCapture(id.to_string()))?;
        self.gallery.remove(index);

        let was_selected = self.selected.as_deref() == Some(id);
        if was_selected {
            self.selected = None;
        }

        if self.gallery.is_empty() && self.state == CaptureState::GallerySelection {
            self.state = CaptureState::Idle;
        }

        Ok(was_selected)
    }

    pub fn clear_gallery(&mut self) {
        self.gallery.clear();
        self.selected = None;
        if self.state == CaptureState::GallerySelection {
            self.state = CaptureState::Idle;
        }
    }

    /// Stops the camera and discards the gallery.
    pub fn close(&mut self) {
        self.client.stop();
        self.clear_gallery();
        self.state = CaptureState::Idle;
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn gallery(&self) -> &[CapturedImage] {
        &self.gallery
    }

    pub fn selected(&self) -> Option<&CapturedImage> {
        self.selected.as_deref().and_then(|id| self.find(id))
    }

    pub fn device(&self) -> &D {
        self.client.device()
    }

    fn find(&self, id: &str) -> Option<&CapturedImage> {
        self.gallery.iter().find(|c| c.id == id)
    }

    fn resting_state(&self) -> CaptureState {
        if self.gallery.is_empty() {
            CaptureState::Idle
        } else {
            CaptureState::GallerySelection
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DeviceFailure, SyntheticDevice};
    use std::collections::HashSet;

    fn streaming() -> (CaptureSession<SyntheticDevice>, SyntheticDevice) {
        let probe = SyntheticDevice::new();
        let mut session = CaptureSession::new(probe.clone());
        session
            .start_camera(FacingMode::User, QualityPreset::Low)
            .unwrap();
        (session, probe)
    }

    #[test]
    fn test_three_captures_have_unique_ids() {
        let (mut session, _) = streaming();
        for _ in 0..3 {
            session.capture_photo().unwrap();
        }

        let ids: HashSet<_> = session.gallery().iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(session.state(), CaptureState::Streaming);
        for c in session.gallery() {
            assert!(c.preview.starts_with("data:image/png;base64,"));
            assert_eq!(c.artifact.mime(), "image/png");
        }
    }

    #[test]
    fn test_capture_uses_native_resolution() {
        let probe = SyntheticDevice::new().with_max_resolution(800, 600);
        let mut session = CaptureSession::new(probe);
        session
            .start_camera(FacingMode::Environment, QualityPreset::High)
            .unwrap();

        let captured = session.capture_photo().unwrap();
        let decoded = image::load_from_memory(captured.artifact.bytes()).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (800, 600));
    }

    #[test]
    fn test_stop_with_gallery_enters_selection() {
        let (mut session, probe) = streaming();
        session.capture_photo().unwrap();
        session.stop_camera();

        assert_eq!(session.state(), CaptureState::GallerySelection);
        assert_eq!(probe.open_streams(), 0);
    }

    #[test]
    fn test_stop_without_gallery_is_idle() {
        let (mut session, _) = streaming();
        session.stop_camera();
        session.stop_camera();
        assert_eq!(session.state(), CaptureState::Idle);
    }

    #[test]
    fn test_delete_selected_clears_selection() {
        let (mut session, _) = streaming();
        let first = session.capture_photo().unwrap();
        let second = session.capture_photo().unwrap();

        session.select_captured(&first.id).unwrap();
        assert_eq!(session.selected().map(|c| c.id.as_str()), Some(first.id.as_str()));
        assert_eq!(session.state(), CaptureState::Idle);

        assert!(!session.delete_captured(&second.id).unwrap());
        assert!(session.delete_captured(&first.id).unwrap());
        assert!(session.selected().is_none());
    }

    #[test]
    fn test_delete_last_entry_returns_to_idle() {
        let (mut session, _) = streaming();
        let only = session.capture_photo().unwrap();
        session.stop_camera();

        session.delete_captured(&only.id).unwrap();
        assert_eq!(session.state(), CaptureState::Idle);
    }

    #[test]
    fn test_unknown_capture() {
        let (mut session, _) = streaming();
        assert!(matches!(
            session.select_captured("nope"),
            Err(CameraError::UnknownCapture(_))
        ));
        assert!(matches!(
            session.delete_captured("nope"),
            Err(CameraError::UnknownCapture(_))
        ));
    }

    #[test]
    fn test_close_releases_and_clears() {
        let (mut session, probe) = streaming();
        session.capture_photo().unwrap();
        session.close();

        assert!(session.gallery().is_empty());
        assert_eq!(session.state(), CaptureState::Idle);
        assert_eq!(probe.open_streams(), 0);
    }

    #[test]
    fn test_start_failure_is_reported() {
        let probe = SyntheticDevice::new();
        probe.set_failure(Some(DeviceFailure::NotFound));
        let mut session = CaptureSession::new(probe);

        assert!(matches!(
            session.start_camera(FacingMode::User, QualityPreset::Medium),
            Err(CameraError::NotFound)
        ));
        assert_eq!(session.state(), CaptureState::Idle);
        assert!(matches!(session.capture_photo(), Err(CameraError::NotStreaming)));
    }

    #[test]
    fn test_restart_keeps_single_stream() {
        let (mut session, probe) = streaming();
        assert!(session.restart(FacingMode::Environment, QualityPreset::High).unwrap());
        assert_eq!(probe.open_streams(), 1);
        assert_eq!(probe.acquired_total(), 2);

        session.stop_camera();
        assert!(!session.restart(FacingMode::User, QualityPreset::Low).unwrap());
        assert_eq!(probe.acquired_total(), 2);
    }
}
