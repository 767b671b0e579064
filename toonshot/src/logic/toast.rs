//! Toast notification module
//!
//! Toasts are queued on the session and drained by whatever front end drives
//! it. Each push is also logged.

use super::Session;
use bot::Stylizer;
use camera::MediaDevice;

/// Toasts kept for a front end that has not drained them. Older ones drop.
pub const MAX_TOASTS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastStatus {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub status: ToastStatus,
    pub message: String,
}

/// Macro to queue a warning toast
///
/// # Parameters
/// - `$session`: Session instance
/// - `$msg`: Warning message
#[macro_export]
macro_rules! toast_warn {
    ($session:expr, $msg:expr) => {
        $session.push_toast($crate::logic::ToastStatus::Warning, format!("{}", $msg))
    };
}

/// Macro to queue a success toast
///
/// # Parameters
/// - `$session`: Session instance
/// - `$msg`: Success message
#[macro_export]
macro_rules! toast_success {
    ($session:expr, $msg:expr) => {
        $session.push_toast($crate::logic::ToastStatus::Success, format!("{}", $msg))
    };
}

/// Macro to queue an info toast
///
/// # Parameters
/// - `$session`: Session instance
/// - `$msg`: Info message
#[macro_export]
macro_rules! toast_info {
    ($session:expr, $msg:expr) => {
        $session.push_toast($crate::logic::ToastStatus::Info, format!("{}", $msg))
    };
}

impl<D: MediaDevice, S: Stylizer> Session<D, S> {
    pub fn push_toast(&mut self, status: ToastStatus, message: String) {
        match status {
            ToastStatus::Warning => log::warn!("{message}"),
            _ => log::info!("{message}"),
        }

        if self.toasts.len() >= MAX_TOASTS {
            self.toasts.pop_front();
        }
        self.toasts.push_back(Toast { status, message });
    }

    /// Drains the queued toasts, oldest first.
    pub fn take_toasts(&mut self) -> Vec<Toast> {
        self.toasts.drain(..).collect()
    }

    pub fn last_toast(&self) -> Option<&Toast> {
        self.toasts.back()
    }
}
