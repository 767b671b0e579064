use crate::{
    CameraError, CameraResult, FacingMode, rgb_to_rgba,
    device::{MediaDevice, StreamConstraints, StreamId},
};
use image::RgbaImage;
use nokhwa::{
    CallbackCamera, NokhwaError, query,
    pixel_format::{RgbAFormat, RgbFormat},
    utils::{ApiBackend, CameraIndex, RequestedFormat, RequestedFormatType, Resolution},
};
use std::collections::HashMap;

/// Real cameras through nokhwa.
///
/// There is no facing metadata on desktop backends: `user` picks the first
/// camera and `environment` the last one.
#[derive(Default)]
pub struct NativeDevice {
    next_id: u64,
    streams: HashMap<StreamId, CallbackCamera>,
}

impl NativeDevice {
    pub fn new() -> Self {
        crate::init();
        Self::default()
    }

    fn pick_camera(facing: FacingMode) -> CameraResult<CameraIndex> {
        let cameras = query(ApiBackend::Auto).map_err(classify)?;
        let camera = match facing {
            FacingMode::User => cameras.first(),
            FacingMode::Environment => cameras.last(),
        };

        camera
            .map(|c| c.index().clone())
            .ok_or(CameraError::NotFound)
    }
}

impl MediaDevice for NativeDevice {
    fn acquire(&mut self, constraints: &StreamConstraints) -> CameraResult<StreamId> {
        let index = Self::pick_camera(constraints.facing)?;
        let format = RequestedFormat::new::<RgbAFormat>(RequestedFormatType::AbsoluteHighestFrameRate);

        let mut camera = CallbackCamera::new(index, format, move |_| {}).map_err(classify)?;

        let (w, h) = (constraints.ideal_width, constraints.ideal_height);
        if let Err(e) = camera.set_resolution(Resolution::new(w, h)) {
            log::warn!("camera set resolution ({w} x {h}) failed: {e}");
        }

        camera.open_stream().map_err(classify)?;

        self.next_id += 1;
        let id = StreamId(self.next_id);
        self.streams.insert(id, camera);
        Ok(id)
    }

    fn release(&mut self, id: StreamId) -> CameraResult<()> {
        match self.streams.remove(&id) {
            Some(mut camera) => camera
                .stop_stream()
                .map_err(|e| CameraError::Backend(e.to_string())),
            None => Ok(()),
        }
    }

    fn grab_frame(&mut self, id: StreamId) -> CameraResult<RgbaImage> {
        let camera = self.streams.get(&id).ok_or(CameraError::NotStreaming)?;
        let buffer = camera.last_frame().map_err(classify)?;

        if let Ok(frame) = buffer.decode_image::<RgbAFormat>() {
            return Ok(frame);
        }

        match buffer.decode_image::<RgbFormat>() {
            Ok(rgb_image) => Ok(rgb_to_rgba(&rgb_image)),
            Err(_) => Err(CameraError::NoFrameAvailable),
        }
    }
}

impl Drop for NativeDevice {
    fn drop(&mut self) {
        for (_, mut camera) in self.streams.drain() {
            _ = camera.stop_stream();
        }
    }
}

fn classify(e: NokhwaError) -> CameraError {
    let msg = e.to_string();
    let lower = msg.to_lowercase();

    match e {
        NokhwaError::UnsupportedOperationError(_) | NokhwaError::NotImplementedError(_) => {
            CameraError::Unsupported
        }
        _ if lower.contains("permission") || lower.contains("denied") => {
            CameraError::PermissionDenied
        }
        _ if lower.contains("busy") || lower.contains("in use") => CameraError::Busy,
        NokhwaError::OpenDeviceError(_, _) => CameraError::NotFound,
        _ => CameraError::Backend(msg),
    }
}
