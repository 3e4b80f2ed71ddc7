//! Overlay layer and tap-triggered one-shot capture.

mod controller;

pub use controller::{OneShotCapturePort, OverlayController, TouchDisposition};
