use std::sync::Arc;

use anyhow::Result;
use ck_core::ports::HistoryStorePort;
use ck_core::DedupGate;
use tracing::info;

/// Delete every record and forget the last persisted content, so the same
/// clipboard text is captured again after a clear.
///
/// 清空历史并重置去重状态。
pub struct ClearHistory {
    history: Arc<dyn HistoryStorePort>,
    gate: Arc<DedupGate>,
}

impl ClearHistory {
    pub fn new(history: Arc<dyn HistoryStorePort>, gate: Arc<DedupGate>) -> Self {
        Self { history, gate }
    }

    #[tracing::instrument(name = "usecase.clear_history.execute", skip(self))]
    pub async fn execute(&self) -> Result<u64> {
        let deleted = self.history.delete_all().await?;
        self.gate.reset();
        info!(deleted, "History cleared");
        Ok(deleted)
    }
}
