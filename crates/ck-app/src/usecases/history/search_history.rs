use std::sync::Arc;

use anyhow::Result;
use ck_core::ports::HistoryStorePort;
use ck_core::ClipRecord;
use tracing::info;

/// Substring search over stored clips, newest first.
pub struct SearchHistory {
    history: Arc<dyn HistoryStorePort>,
}

impl SearchHistory {
    pub fn new(history: Arc<dyn HistoryStorePort>) -> Self {
        Self { history }
    }

    /// An empty query matches everything.
    #[tracing::instrument(name = "usecase.search_history.execute", skip(self, query))]
    pub async fn execute(&self, query: &str) -> Result<Vec<ClipRecord>> {
        let records = if query.is_empty() {
            self.history.query_all().await?
        } else {
            self.history.query_search(query).await?
        };
        info!(count = records.len(), "Searched history");
        Ok(records)
    }
}
