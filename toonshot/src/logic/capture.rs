use super::Session;
use crate::{toast_info, toast_success, toast_warn};
use bot::Stylizer;
use camera::{CameraError, MediaDevice, QualityPreset};
use std::path::PathBuf;

impl<D: MediaDevice, S: Stylizer> Session<D, S> {
    pub(super) fn select_files(&mut self, paths: &[PathBuf]) {
        match camera::select_files(paths) {
            Ok(Some(file)) => {
                toast_success!(self, format!("Loaded {}", file.artifact.name()));
                self.set_raw(file.raster, file.artifact, None);
            }
            Ok(None) => toast_warn!(self, "Could not read the selected image"),
            Err(e) if e.is_input_error() => toast_warn!(self, e),
            Err(e) => toast_warn!(self, format!("Could not read the selected image. {e}")),
        }
    }

    pub(super) fn start_camera(&mut self) {
        let preference = self.config.preference.clone();
        match self
            .capture
            .start_camera(preference.camera_facing_mode, preference.camera_quality)
        {
            Ok(_) => toast_info!(
                self,
                format!(
                    "Camera started ({}, {})",
                    preference.camera_facing_mode, preference.camera_quality
                )
            ),
            Err(e) => self.camera_failed(e),
        }
    }

    pub(super) fn stop_camera(&mut self) {
        self.capture.stop_camera();
    }

    pub(super) fn toggle_facing(&mut self) {
        let facing = self.config.preference.camera_facing_mode.toggled();
        self.config.preference.camera_facing_mode = facing;
        self.save_preference();
        self.restart_camera();
    }

    pub(super) fn change_quality(&mut self, quality: QualityPreset) {
        self.config.preference.camera_quality = quality;
        self.save_preference();
        self.restart_camera();
    }

    pub(super) fn capture_photo(&mut self) {
        match self.capture.capture_photo() {
            Ok(_) => toast_success!(
                self,
                format!("Photo captured ({} in gallery)", self.capture.gallery().len())
            ),
            Err(e) => toast_warn!(self, e),
        }
    }

    pub(super) fn select_captured(&mut self, id: &str) {
        let captured = match self.capture.select_captured(id) {
            Ok(captured) => captured,
            Err(e) => {
                toast_warn!(self, e);
                return;
            }
        };

        match image_effect::decode_rgba(captured.artifact.bytes()) {
            Ok(raster) => self.set_raw(raster, captured.artifact, Some(captured.id)),
            Err(e) => toast_warn!(self, format!("Could not open the captured photo. {e}")),
        }
    }

    pub(super) fn delete_captured(&mut self, id: &str) {
        match self.capture.delete_captured(id) {
            Ok(was_selected) => {
                if was_selected && self.raw_capture_id.as_deref() == Some(id) {
                    self.clear_raw();
                }
                toast_info!(self, "Photo deleted");
            }
            Err(e) => toast_warn!(self, e),
        }
    }

    pub(super) fn clear_gallery(&mut self) {
        self.capture.clear_gallery();
    }

    pub(super) fn close_capture(&mut self) {
        self.capture.close();
    }

    fn save_preference(&mut self) {
        if let Err(e) = self.config.save() {
            toast_warn!(self, format!("Save camera preference failed. {e}"));
        }
    }

    fn restart_camera(&mut self) {
        let preference = self.config.preference.clone();
        match self
            .capture
            .restart(preference.camera_facing_mode, preference.camera_quality)
        {
            Ok(true) => log::info!(
                "camera restarted with {} {}",
                preference.camera_facing_mode,
                preference.camera_quality
            ),
            Ok(false) => (),
            Err(e) => self.camera_failed(e),
        }
    }

    fn camera_failed(&mut self, e: CameraError) {
        if e.is_device_error() {
            toast_warn!(self, e);
        } else {
            toast_warn!(self, format!("Could not start the camera. {e}"));
        }
    }
}
