//! Capture strategy contract, outcomes and bounded reads.

mod bounded;
mod outcome;
mod strategy;

pub use bounded::{bounded_read, truncate_error};
pub use outcome::{CaptureOutcome, CaptureTrigger};
pub use strategy::{
    normalize_captured_text, CaptureResult, CaptureStrategy, RankedStrategy, StrategyChain,
    StrategyId,
};
