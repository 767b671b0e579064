//! # CUtil - Common Utilities Library
//!
//! A collection of small utility modules shared by the toonshot crates.
//!
//! ## Features
//!
//! - `fs`: File name and extension helpers
//! - `time`: Time formatting and timestamps
//! - `artifact`: Immutable encoded image payloads and `data:` URI conversion

#[cfg(feature = "fs")]
pub mod fs;

#[cfg(feature = "time")]
pub mod time;

#[cfg(feature = "artifact")]
pub mod artifact;
