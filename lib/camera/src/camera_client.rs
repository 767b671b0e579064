use crate::{
    CameraError, CameraResult,
    device::{MediaDevice, StreamConstraints, StreamId},
};
use image::RgbaImage;

#[derive(Debug, Clone, Copy)]
struct ActiveStream {
    id: StreamId,
    constraints: StreamConstraints,
}

/// Owns at most one stream of a [`MediaDevice`] and releases it on drop.
pub struct CameraClient<D: MediaDevice> {
    device: D,
    stream: Option<ActiveStream>,
}

impl<D: MediaDevice> CameraClient<D> {
    pub fn new(device: D) -> Self {
        Self {
            device,
            stream: None,
        }
    }

    /// Opens a stream, tearing down the active one first.
    pub fn start(&mut self, constraints: StreamConstraints) -> CameraResult<()> {
        self.stop();

        let id = self.device.acquire(&constraints)?;
        log::info!(
            "camera started: {id} facing={} ideal={}x{}",
            constraints.facing,
            constraints.ideal_width,
            constraints.ideal_height
        );

        self.stream = Some(ActiveStream { id, constraints });
        Ok(())
    }

    /// Releases the active stream. Calling it while stopped does nothing.
    pub fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            match self.device.release(stream.id) {
                Ok(_) => log::info!("camera stopped: {}", stream.id),
                Err(e) => log::warn!("camera release {} failed: {e}", stream.id),
            }
        }
    }

    /// Stop-then-start with new constraints, only if a stream is active.
    pub fn restart(&mut self, constraints: StreamConstraints) -> CameraResult<bool> {
        if !self.is_running() {
            return Ok(false);
        }

        self.start(constraints)?;
        Ok(true)
    }

    pub fn last_frame(&mut self) -> CameraResult<RgbaImage> {
        let stream = self.stream.ok_or(CameraError::NotStreaming)?;
        let frame = self.device.grab_frame(stream.id)?;

        if frame.is_empty() {
            return Err(CameraError::NoFrameAvailable);
        }
        Ok(frame)
    }

    pub fn is_running(&self) -> bool {
        self.stream.is_some()
    }

    pub fn constraints(&self) -> Option<StreamConstraints> {
        self.stream.map(|s| s.constraints)
    }

    pub fn device(&self) -> &D {
        &self.device
    }
}

impl<D: MediaDevice> Drop for CameraClient<D> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DeviceFailure, FacingMode, QualityPreset, SyntheticDevice};

    #[test]
    fn test_start_twice_keeps_one_stream() {
        let probe = SyntheticDevice::new();
        let mut client = CameraClient::new(probe.clone());

        client
            .start(StreamConstraints::new(FacingMode::User, QualityPreset::Low))
            .unwrap();
        client
            .start(StreamConstraints::new(FacingMode::Environment, QualityPreset::High))
            .unwrap();

        assert_eq!(probe.open_streams(), 1);
        assert_eq!(probe.acquired_total(), 2);
        assert_eq!(client.constraints().unwrap().facing, FacingMode::Environment);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let probe = SyntheticDevice::new();
        let mut client = CameraClient::new(probe.clone());
        client.start(StreamConstraints::default()).unwrap();

        client.stop();
        client.stop();
        assert!(!client.is_running());
        assert_eq!(probe.open_streams(), 0);
        assert!(matches!(client.last_frame(), Err(CameraError::NotStreaming)));
    }

    #[test]
    fn test_drop_releases_stream() {
        let probe = SyntheticDevice::new();
        {
            let mut client = CameraClient::new(probe.clone());
            client.start(StreamConstraints::default()).unwrap();
            assert_eq!(probe.open_streams(), 1);
        }
        assert_eq!(probe.open_streams(), 0);
    }

    #[test]
    fn test_restart_only_when_running() {
        let probe = SyntheticDevice::new();
        let mut client = CameraClient::new(probe.clone());
        let high = StreamConstraints::new(FacingMode::User, QualityPreset::High);

        assert!(!client.restart(high).unwrap());
        assert_eq!(probe.acquired_total(), 0);

        client.start(StreamConstraints::default()).unwrap();
        assert!(client.restart(high).unwrap());
        assert_eq!(client.last_frame().unwrap().dimensions(), (1920, 1080));
        assert_eq!(probe.open_streams(), 1);
    }

    #[test]
    fn test_failed_start_leaves_no_stream() {
        let probe = SyntheticDevice::new();
        let mut client = CameraClient::new(probe.clone());
        client.start(StreamConstraints::default()).unwrap();

        probe.set_failure(Some(DeviceFailure::PermissionDenied));
        assert!(matches!(
            client.start(StreamConstraints::default()),
            Err(CameraError::PermissionDenied)
        ));
        assert!(!client.is_running());
        assert_eq!(probe.open_streams(), 0);
    }
}
