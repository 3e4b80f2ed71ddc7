use std::sync::Arc;

use anyhow::Result;
use ck_core::ports::HistoryStorePort;
use ck_core::ClipRecord;
use tracing::info;

/// List stored clips, newest first.
/// 按时间倒序列出历史记录。
pub struct ListHistory {
    history: Arc<dyn HistoryStorePort>,
}

impl ListHistory {
    pub fn new(history: Arc<dyn HistoryStorePort>) -> Self {
        Self { history }
    }

    /// `limit = None` returns everything.
    #[tracing::instrument(name = "usecase.list_history.execute", skip(self))]
    pub async fn execute(&self, limit: Option<usize>) -> Result<Vec<ClipRecord>> {
        let mut records = self.history.query_all().await?;
        if let Some(limit) = limit {
            records.truncate(limit);
        }
        info!(count = records.len(), "Listed history");
        Ok(records)
    }
}
