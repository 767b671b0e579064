//! Deterministic in-memory camera for tests.
//!
//! Frames are a facing-tinted gradient whose red channel shifts with every
//! grab. Failures can be injected per device.

use crate::{CameraError, CameraResult, FacingMode, MediaDevice, StreamConstraints, StreamId};
use image::{Rgba, RgbaImage};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

/// Failure classes a [`SyntheticDevice`] can be told to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceFailure {
    PermissionDenied,
    NotFound,
    Busy,
    Unsupported,
}

impl From<DeviceFailure> for CameraError {
    fn from(failure: DeviceFailure) -> Self {
        match failure {
            DeviceFailure::PermissionDenied => CameraError::PermissionDenied,
            DeviceFailure::NotFound => CameraError::NotFound,
            DeviceFailure::Busy => CameraError::Busy,
            DeviceFailure::Unsupported => CameraError::Unsupported,
        }
    }
}

#[derive(Debug)]
struct SyntheticStream {
    facing: FacingMode,
    width: u32,
    height: u32,
    frames: u32,
}

#[derive(Debug, Default)]
struct SyntheticState {
    next_id: u64,
    streams: HashMap<StreamId, SyntheticStream>,
    failure: Option<DeviceFailure>,
    max_resolution: Option<(u32, u32)>,
    acquired: usize,
}

/// Deterministic camera. Clones share state, so a test can keep a handle
/// and probe it after moving the device into a client.
#[derive(Debug, Clone, Default)]
pub struct SyntheticDevice {
    state: Arc<Mutex<SyntheticState>>,
}

impl SyntheticDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the resolution; larger requests get this size instead.
    pub fn with_max_resolution(self, width: u32, height: u32) -> Self {
        self.state.lock().unwrap().max_resolution = Some((width, height));
        self
    }

    /// Makes every following `acquire` fail until cleared with `None`.
    pub fn set_failure(&self, failure: Option<DeviceFailure>) {
        self.state.lock().unwrap().failure = failure;
    }

    /// Streams acquired and not yet released.
    pub fn open_streams(&self) -> usize {
        self.state.lock().unwrap().streams.len()
    }

    /// Total number of successful `acquire` calls.
    pub fn acquired_total(&self) -> usize {
        self.state.lock().unwrap().acquired
    }

    /// Resolution and facing of an open stream.
    pub fn stream_info(&self, id: StreamId) -> Option<(FacingMode, u32, u32)> {
        self.state
            .lock()
            .unwrap()
            .streams
            .get(&id)
            .map(|s| (s.facing, s.width, s.height))
    }
}

impl MediaDevice for SyntheticDevice {
    fn acquire(&mut self, constraints: &StreamConstraints) -> CameraResult<StreamId> {
        let mut state = self.state.lock().unwrap();
        if let Some(failure) = state.failure {
            return Err(failure.into());
        }

        let (width, height) = match state.max_resolution {
            Some((w, h)) if constraints.ideal_width > w || constraints.ideal_height > h => (w, h),
            _ => (constraints.ideal_width, constraints.ideal_height),
        };

        state.next_id += 1;
        state.acquired += 1;
        let id = StreamId(state.next_id);
        state.streams.insert(
            id,
            SyntheticStream {
                facing: constraints.facing,
                width,
                height,
                frames: 0,
            },
        );

        log::debug!("synthetic {id} opened at {width}x{height} ({})", constraints.facing);
        Ok(id)
    }

    fn release(&mut self, id: StreamId) -> CameraResult<()> {
        if self.state.lock().unwrap().streams.remove(&id).is_some() {
            log::debug!("synthetic {id} released");
        }
        Ok(())
    }

    fn grab_frame(&mut self, id: StreamId) -> CameraResult<RgbaImage> {
        let mut state = self.state.lock().unwrap();
        let stream = state
            .streams
            .get_mut(&id)
            .ok_or(CameraError::NotStreaming)?;

        stream.frames = stream.frames.wrapping_add(1);
        let tint = match stream.facing {
            FacingMode::User => [220u8, 140, 90],
            FacingMode::Environment => [70u8, 130, 210],
        };
        let (w, h, seq) = (stream.width.max(1), stream.height.max(1), stream.frames);

        Ok(RgbaImage::from_fn(w, h, |x, y| {
            let fx = (x * 255 / w) as u8;
            let fy = (y * 255 / h) as u8;
            Rgba([
                tint[0].wrapping_add(fx / 4).wrapping_add(seq as u8),
                tint[1].wrapping_add(fy / 4),
                tint[2].wrapping_sub(fx / 8),
                255,
            ])
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QualityPreset;

    #[test]
    fn test_acquire_release() {
        let mut device = SyntheticDevice::new();
        let probe = device.clone();

        let id = device
            .acquire(&StreamConstraints::new(FacingMode::User, QualityPreset::Low))
            .unwrap();
        assert_eq!(probe.open_streams(), 1);
        assert_eq!(probe.stream_info(id), Some((FacingMode::User, 640, 480)));

        device.release(id).unwrap();
        device.release(id).unwrap();
        assert_eq!(probe.open_streams(), 0);
    }

    #[test]
    fn test_device_substitutes_resolution() {
        let mut device = SyntheticDevice::new().with_max_resolution(1280, 720);
        let id = device
            .acquire(&StreamConstraints::new(FacingMode::Environment, QualityPreset::High))
            .unwrap();

        let frame = device.grab_frame(id).unwrap();
        assert_eq!(frame.dimensions(), (1280, 720));
    }

    #[test]
    fn test_injected_failure() {
        let mut device = SyntheticDevice::new();
        device.set_failure(Some(DeviceFailure::Busy));
        assert!(matches!(
            device.acquire(&StreamConstraints::default()),
            Err(CameraError::Busy)
        ));
        assert_eq!(device.open_streams(), 0);

        device.set_failure(None);
        assert!(device.acquire(&StreamConstraints::default()).is_ok());
    }

    #[test]
    fn test_grab_from_released_stream() {
        let mut device = SyntheticDevice::new();
        let id = device.acquire(&StreamConstraints::default()).unwrap();
        device.release(id).unwrap();
        assert!(matches!(device.grab_frame(id), Err(CameraError::NotStreaming)));
    }
}
