//! clipkeep application layer
//!
//! Capture strategies, the capture pipeline and its orchestrator runtime,
//! the overlay controller and the history / settings use cases.

pub mod app_paths;
pub mod capture;
pub mod overlay;
pub mod usecases;

pub use app_paths::AppPaths;
pub use capture::{CaptureHandle, CapturePipeline, CaptureRuntime, OrchestratorState, RuntimeConfig};
pub use overlay::{OneShotCapturePort, OverlayController, TouchDisposition};
