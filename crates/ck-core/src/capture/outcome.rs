use std::fmt;

use serde::{Deserialize, Serialize};

use super::strategy::StrategyId;
use crate::ids::RecordId;

/// What caused a capture attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureTrigger {
    Poll,
    Burst { attempt: u32 },
    OneShot,
}

impl fmt::Display for CaptureTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureTrigger::Poll => f.write_str("poll"),
            CaptureTrigger::Burst { attempt } => write!(f, "burst#{attempt}"),
            CaptureTrigger::OneShot => f.write_str("one_shot"),
        }
    }
}

/// Result of one pass through the capture pipeline.
///
/// 一次捕获流水线执行的结果。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CaptureOutcome {
    /// New content stored (or matched an existing row in the store).
    Persisted { id: RecordId, source: StrategyId },
    /// Content identical to the last persisted one; store not touched.
    Duplicate { source: StrategyId },
    /// No strategy produced content.
    Empty,
    /// Content was read but the store rejected it.
    PersistFailed { source: StrategyId },
    /// Not attempted (paused or stopping).
    Skipped,
}

impl CaptureOutcome {
    /// New content reached the store. A burst keeps retrying until this,
    /// since a `Duplicate` may be the previous clipboard read before the
    /// change landed.
    pub fn is_persisted(&self) -> bool {
        matches!(self, CaptureOutcome::Persisted { .. })
    }

    pub fn source(&self) -> Option<StrategyId> {
        match self {
            CaptureOutcome::Persisted { source, .. }
            | CaptureOutcome::Duplicate { source }
            | CaptureOutcome::PersistFailed { source } => Some(*source),
            CaptureOutcome::Empty | CaptureOutcome::Skipped => None,
        }
    }
}
