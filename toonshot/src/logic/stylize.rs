use super::Session;
use crate::{toast_info, toast_success, toast_warn};
use bot::{StyleTag, Stylizer};
use camera::MediaDevice;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Holds the processing flag for one submission and clears it on drop.
pub struct ProcessingGuard {
    flag: Arc<AtomicBool>,
}

impl ProcessingGuard {
    /// Returns `None` if another submission already holds the flag.
    pub fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag: flag.clone() })
    }
}

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl<D: MediaDevice, S: Stylizer> Session<D, S> {
    pub(super) fn select_style(&mut self, style: StyleTag) {
        log::debug!("style: {} -> {style}", self.style);
        self.style = style;
    }

    pub(super) async fn submit(&mut self) {
        let Some(_guard) = ProcessingGuard::acquire(&self.processing) else {
            toast_warn!(self, "A conversion is already in progress");
            return;
        };

        let Some(active) = self.active.clone() else {
            toast_warn!(self, "Select or capture an image first");
            return;
        };

        toast_info!(self, format!("Converting to {} style...", self.style));
        let outcome = self.stylizer.stylize(&active, self.style).await;
        match outcome {
            Ok(cartoon) => {
                log::info!("received {} ({} bytes)", cartoon.name(), cartoon.len());
                self.result = Some(cartoon);
                toast_success!(self, "Your cartoon is ready");
            }
            Err(e) => toast_warn!(self, failure_message(&e)),
        }
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    /// Shared handle to the processing flag, for front ends that poll it.
    pub fn processing_flag(&self) -> Arc<AtomicBool> {
        self.processing.clone()
    }
}

fn failure_message(e: &bot::Error) -> String {
    match e {
        bot::Error::RateLimited(msg) => with_hint(msg, "try again later"),
        bot::Error::QuotaExceeded(msg) => with_hint(msg, "add credits"),
        bot::Error::InvalidInput(msg) => msg.clone(),
        bot::Error::Request(e) => format!("Cannot reach the conversion service. {e}"),
        _ => format!("Conversion failed. {e}"),
    }
}

fn with_hint(msg: &str, hint: &str) -> String {
    if msg.to_lowercase().contains(hint) {
        msg.to_string()
    } else {
        format!("{msg} ({hint})")
    }
}
