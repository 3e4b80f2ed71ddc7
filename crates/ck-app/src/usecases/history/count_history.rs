use std::sync::Arc;

use anyhow::Result;
use ck_core::ports::HistoryStorePort;

pub struct CountHistory {
    history: Arc<dyn HistoryStorePort>,
}

impl CountHistory {
    pub fn new(history: Arc<dyn HistoryStorePort>) -> Self {
        Self { history }
    }

    #[tracing::instrument(name = "usecase.count_history.execute", skip(self))]
    pub async fn execute(&self) -> Result<u64> {
        self.history.count().await
    }
}
