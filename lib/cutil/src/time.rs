//! Time formatting and timestamp utilities.

use chrono::Local;

/// Formats the current local time according to the specified format string.
///
/// The format string follows the same syntax as `chrono::format::strftime`.
///
/// # Examples
///
/// ```
/// use cutil::time::local_now;
///
/// let formatted = local_now("%Y-%m-%d %H:%M:%S");
/// println!("Current time: {}", formatted);
/// ```
pub fn local_now(format: &str) -> String {
    Local::now().format(format).to_string()
}

/// Gets the current Unix timestamp (seconds since epoch).
pub fn timestamp() -> i64 {
    Local::now().timestamp()
}

/// Gets the current Unix timestamp in milliseconds.
///
/// # Examples
///
/// ```
/// use cutil::time::{timestamp, timestamp_millis};
///
/// assert!(timestamp_millis() / 1000 >= timestamp() - 1);
/// ```
pub fn timestamp_millis() -> i64 {
    Local::now().timestamp_millis()
}
