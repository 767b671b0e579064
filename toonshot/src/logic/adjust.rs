use super::Session;
use crate::toast_warn;
use bot::Stylizer;
use camera::MediaDevice;
use image_effect::{AdjustParam, ImageEffectError, RenderTicket, Rendered};

impl<D: MediaDevice, S: Stylizer> Session<D, S> {
    pub(super) async fn set_adjustment(&mut self, param: AdjustParam, percent: u16) {
        let Some(ticket) = self.begin_adjustment(param, percent) else {
            return;
        };

        match tokio::task::spawn_blocking(move || ticket.render()).await {
            Ok(Ok(rendered)) => {
                self.finish_render(rendered);
            }
            Ok(Err(e)) => toast_warn!(self, format!("Adjust {} failed. {e}", param.name())),
            Err(e) => toast_warn!(self, format!("Adjust {} failed. {e}", param.name())),
        }
    }

    /// Records the new parameter and returns the render it needs.
    pub fn begin_adjustment(&mut self, param: AdjustParam, percent: u16) -> Option<RenderTicket> {
        match self.stage.adjust(param, percent) {
            Ok(ticket) => Some(ticket),
            Err(ImageEffectError::NoSource) => {
                toast_warn!(self, "Select or capture an image first");
                None
            }
            Err(e) => {
                toast_warn!(self, e);
                None
            }
        }
    }

    /// Makes a finished render active unless a newer source or newer
    /// parameters superseded it. Returns whether it was applied.
    pub fn finish_render(&mut self, rendered: Rendered) -> bool {
        match self.stage.commit(rendered) {
            Some(artifact) => {
                self.active = Some(artifact);
                true
            }
            None => false,
        }
    }

    pub(super) fn reset_adjustment(&mut self) {
        if self.stage.reset().is_none() {
            toast_warn!(self, "Select or capture an image first");
            return;
        }

        // Identity is the raw image itself, not a re-encode of it.
        self.active = self.raw.clone();
    }
}
