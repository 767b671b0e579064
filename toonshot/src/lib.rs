//! Photo to cartoon converter
//!
//! A headless session controller that takes an image from a file or a camera,
//! applies brightness/contrast/saturation, and hands it to a remote
//! stylization endpoint. The `toonshot` binary drives the session from the
//! command line.
//!
//! # Architecture
//! - `config`: persisted preferences and endpoint settings
//! - `logic`: the [`logic::Session`] state machine and its actions
//! - `cli`: command line entry points

#[macro_use]
extern crate derivative;

pub mod cli;
pub mod config;
pub mod logic;

pub use logic::{Action, MAX_TOASTS, Session, Toast, ToastStatus};

/// Initializes the logger for desktop platforms.
///
/// Sets up a custom logger format with timestamp, log level, file name, line number,
/// and log message. Uses local time format for timestamps.
pub fn init_logger() {
    use std::io::Write;

    env_logger::builder()
        .filter_module("reqwest", log::LevelFilter::Warn)
        .filter_module("hyper_util", log::LevelFilter::Warn)
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            let ts = cutil::time::local_now("%H:%M:%S");

            writeln!(
                buf,
                "[{} {style}{}{style:#} {} {}] {}",
                ts,
                record.level(),
                record
                    .file()
                    .unwrap_or("None")
                    .split('/')
                    .next_back()
                    .unwrap_or("None"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}

pub async fn desktop_main() -> anyhow::Result<()> {
    use clap::Parser;

    init_logger();
    cli::run(cli::Cli::parse()).await
}
