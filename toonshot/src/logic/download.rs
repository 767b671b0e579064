use super::Session;
use crate::{toast_success, toast_warn};
use anyhow::{Context, Result};
use bot::Stylizer;
use camera::MediaDevice;
use cutil::artifact::ImageArtifact;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Writes `result` to `<dir>/cartoon-<unix-millis>.png`, transcoding to PNG
/// when the endpoint returned another format.
pub fn save_result(result: &ImageArtifact, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("create {} failed", dir.display()))?;
    let path = dir.join(format!("cartoon-{}.png", cutil::time::timestamp_millis()));

    let written = if result.mime() == "image/png" {
        fs::write(&path, result.bytes())
    } else {
        let raster = image_effect::decode_rgba(result.bytes())?;
        fs::write(&path, image_effect::encode_png(&raster)?)
    };
    written.with_context(|| format!("write {} failed", path.display()))?;

    Ok(path)
}

impl<D: MediaDevice, S: Stylizer> Session<D, S> {
    pub(super) fn download(&mut self, dir: &Path) {
        let Some(result) = self.result.as_ref() else {
            toast_warn!(self, "Nothing to download yet");
            return;
        };

        match save_result(result, dir) {
            Ok(path) => {
                toast_success!(self, format!("Saved {}", path.display()));
                self.last_download = Some(path);
            }
            Err(e) => toast_warn!(self, format!("Download failed. {e:?}")),
        }
    }

    pub(super) fn clear_result(&mut self) {
        self.result = None;
    }
}
