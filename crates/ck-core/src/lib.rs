//! # ck-core
//!
//! Core domain models and capture rules for clipkeep.
//!
//! This crate contains pure business logic without any infrastructure dependencies:
//! the clip record model, the dedup gate, the shell-output parser, the tap
//! classifier and the ports implemented by the infra / platform crates.

pub mod capture;
pub mod clipboard;
pub mod config;
pub mod ids;
pub mod overlay;
pub mod ports;
pub mod settings;

// Re-export commonly used types at the crate root
pub use capture::{CaptureOutcome, CaptureResult, CaptureStrategy, StrategyChain, StrategyId};
pub use clipboard::{ClipRecord, ClipRecordError, ContentHash, DedupGate, ExportedClip};
pub use ids::RecordId;
pub use settings::model::Settings;
