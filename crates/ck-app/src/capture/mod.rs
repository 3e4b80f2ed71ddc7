//! Capture orchestration: strategies, the serialized pipeline and the runtime actor.

pub mod pipeline;
pub mod runtime;
pub mod strategy;

pub use pipeline::CapturePipeline;
pub use runtime::{CaptureHandle, CaptureRuntime, OrchestratorState, RuntimeConfig};
