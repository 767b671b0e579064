//! Session controller
//!
//! [`Session`] owns every piece of user-visible state: the capture session,
//! the adjustment stage, the active artifact, the selected style, the last
//! result and a queue of toasts. Each user action goes through
//! [`Session::handle`], which never returns an error; failures are reported
//! as warning toasts instead.

use crate::config::Config;
use bot::{StyleTag, Stylizer};
use camera::{CaptureSession, CaptureState, CapturedImage, MediaDevice, QualityPreset};
use cutil::artifact::ImageArtifact;
use image_effect::{AdjustParam, AdjustStage, Adjustment};
use std::{
    collections::VecDeque,
    path::PathBuf,
    sync::{Arc, atomic::AtomicBool},
};

mod adjust;
mod capture;
mod download;
mod stylize;
mod toast;

pub use download::save_result;
pub use stylize::ProcessingGuard;
pub use toast::{MAX_TOASTS, Toast, ToastStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectFiles(Vec<PathBuf>),
    StartCamera,
    StopCamera,
    ToggleFacing,
    ChangeQuality(QualityPreset),
    CapturePhoto,
    SelectCaptured(String),
    DeleteCaptured(String),
    ClearGallery,
    CloseCapture,
    SetAdjustment(AdjustParam, u16),
    ResetAdjustment,
    SelectStyle(StyleTag),
    Submit,
    Download(PathBuf),
    ClearResult,
}

pub struct Session<D: MediaDevice, S: Stylizer> {
    capture: CaptureSession<D>,
    stage: AdjustStage,

    // The raw image as acquired, and the capture id it came from, if any.
    raw: Option<ImageArtifact>,
    raw_capture_id: Option<String>,

    active: Option<ImageArtifact>,
    style: StyleTag,
    processing: Arc<AtomicBool>,
    result: Option<ImageArtifact>,
    last_download: Option<PathBuf>,
    toasts: VecDeque<Toast>,
    config: Config,
    stylizer: S,
}

impl<D: MediaDevice, S: Stylizer> Session<D, S> {
    pub fn new(device: D, stylizer: S, config: Config) -> Self {
        Self {
            capture: CaptureSession::new(device),
            stage: AdjustStage::new(),
            raw: None,
            raw_capture_id: None,
            active: None,
            style: StyleTag::default(),
            processing: Arc::new(AtomicBool::new(false)),
            result: None,
            last_download: None,
            toasts: VecDeque::new(),
            config,
            stylizer,
        }
    }

    pub async fn handle(&mut self, action: Action) {
        log::debug!("handle {action:?}");

        match action {
            Action::SelectFiles(paths) => self.select_files(&paths),
            Action::StartCamera => self.start_camera(),
            Action::StopCamera => self.stop_camera(),
            Action::ToggleFacing => self.toggle_facing(),
            Action::ChangeQuality(quality) => self.change_quality(quality),
            Action::CapturePhoto => self.capture_photo(),
            Action::SelectCaptured(id) => self.select_captured(&id),
            Action::DeleteCaptured(id) => self.delete_captured(&id),
            Action::ClearGallery => self.clear_gallery(),
            Action::CloseCapture => self.close_capture(),
            Action::SetAdjustment(param, percent) => self.set_adjustment(param, percent).await,
            Action::ResetAdjustment => self.reset_adjustment(),
            Action::SelectStyle(style) => self.select_style(style),
            Action::Submit => self.submit().await,
            Action::Download(dir) => self.download(&dir),
            Action::ClearResult => self.clear_result(),
        }
    }

    /// Replaces the raw image. Adjustments reset, the style is kept.
    fn set_raw(&mut self, raster: camera::RgbaImage, artifact: ImageArtifact, capture_id: Option<String>) {
        self.stage.set_source(raster, artifact.name());
        self.raw = Some(artifact.clone());
        self.raw_capture_id = capture_id;
        self.active = Some(artifact);
        self.result = None;
    }

    fn clear_raw(&mut self) {
        self.stage.clear();
        self.raw = None;
        self.raw_capture_id = None;
        self.active = None;
    }

    pub fn active(&self) -> Option<&ImageArtifact> {
        self.active.as_ref()
    }

    pub fn result(&self) -> Option<&ImageArtifact> {
        self.result.as_ref()
    }

    pub fn style(&self) -> StyleTag {
        self.style
    }

    pub fn adjustment(&self) -> Adjustment {
        self.stage.adjustment()
    }

    pub fn capture_state(&self) -> CaptureState {
        self.capture.state()
    }

    pub fn gallery(&self) -> &[CapturedImage] {
        self.capture.gallery()
    }

    pub fn device(&self) -> &D {
        self.capture.device()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn last_download(&self) -> Option<&PathBuf> {
        self.last_download.as_ref()
    }
}
