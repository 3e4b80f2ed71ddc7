pub mod config;
pub mod tracing;
pub mod wiring;

pub use config::{load_app_config, load_config};
pub use wiring::{create_capture_layer, wire_dependencies, AppDeps, CaptureLayer};
