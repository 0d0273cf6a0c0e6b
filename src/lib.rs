//! Hand landmark acquisition, annotation and trajectory logging.
//!
//! This crate drives the per-frame cycle around an external hand-landmark
//! detector: read a frame, mirror it, hand it to the detector, and, when a
//! hand was found, annotate the frame, append coordinate rows to a tabular
//! sink, and record recent positions in a bounded trajectory buffer.
//!
//! The detector itself is an injected capability (see
//! [`detector::HandDetector`]); no detection logic lives in this crate.
//!
//! # Coordinates
//!
//! Landmark positions are *normalized image coordinates*: X and Y are in range
//! 0.0 to 1.0 relative to the frame's width and height, with Y pointing down.
//! Z is a detector-defined relative depth on roughly the same scale. Pixel
//! positions are only computed for drawing; logging always uses normalized
//! coordinates.
//!
//! # Environment Variables
//!
//! * `RUST_LOG`: overrides the log filter installed by [`init_logger!`].

use log::LevelFilter;

pub mod detector;
pub mod gui;
pub mod image;
pub mod landmark;
pub mod sink;
pub mod timer;
pub mod tracking;
pub mod trajectory;
pub mod video;

/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = LevelFilter::Debug;
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_PKG_NAME")), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// The calling crate and this crate will log at *debug* level; everything else
/// stays at the `env_logger` default. `RUST_LOG` takes precedence.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
