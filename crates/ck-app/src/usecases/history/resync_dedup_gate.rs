use std::sync::Arc;

use anyhow::Result;
use ck_core::ports::HistoryStorePort;
use ck_core::DedupGate;
use tracing::info;

/// Forget the last persisted content once the store turns out empty.
///
/// `clipkeep clear` runs in its own process and only resets that process's
/// gate; a running watch session calls this periodically so a cleared
/// history captures the current clipboard again.
///
/// 历史被其他进程清空后，重置本进程的去重状态。
pub struct ResyncDedupGate {
    history: Arc<dyn HistoryStorePort>,
    gate: Arc<DedupGate>,
}

impl ResyncDedupGate {
    pub fn new(history: Arc<dyn HistoryStorePort>, gate: Arc<DedupGate>) -> Self {
        Self { history, gate }
    }

    /// Returns whether the gate was reset.
    pub async fn execute(&self) -> Result<bool> {
        if self.gate.last_persisted().is_none() {
            return Ok(false);
        }
        // A persisted record is never removed by the capture path itself, so
        // an empty store with a remembered hash means someone cleared it.
        if self.history.count().await? > 0 {
            return Ok(false);
        }
        self.gate.reset();
        info!("History cleared elsewhere, dedup state reset");
        Ok(true)
    }
}
