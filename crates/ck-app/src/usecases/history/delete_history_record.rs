use std::sync::Arc;

use anyhow::Result;
use ck_core::ports::HistoryStorePort;
use ck_core::RecordId;
use tracing::{info, warn};

/// Delete one record by id.
/// 按 ID 删除一条历史记录。
pub struct DeleteHistoryRecord {
    history: Arc<dyn HistoryStorePort>,
}

impl DeleteHistoryRecord {
    pub fn new(history: Arc<dyn HistoryStorePort>) -> Self {
        Self { history }
    }

    /// Returns `false` if no record had this id.
    #[tracing::instrument(
        name = "usecase.delete_history_record.execute",
        skip(self),
        fields(record_id = %id)
    )]
    pub async fn execute(&self, id: &RecordId) -> Result<bool> {
        let deleted = self.history.delete_one(id).await?;
        if deleted {
            info!("History record deleted");
        } else {
            warn!("History record not found");
        }
        Ok(deleted)
    }
}
