use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use ck_core::ports::HistoryStorePort;
use ck_core::ExportedClip;
use tracing::info;

/// Export the whole history as a JSON array, newest first.
///
/// 将全部历史导出为 JSON 数组（按时间倒序）。
pub struct ExportHistory {
    history: Arc<dyn HistoryStorePort>,
}

impl ExportHistory {
    pub fn new(history: Arc<dyn HistoryStorePort>) -> Self {
        Self { history }
    }

    #[tracing::instrument(name = "usecase.export_history.execute", skip(self))]
    pub async fn execute(&self) -> Result<Vec<ExportedClip>> {
        let records = self.history.query_all().await?;
        Ok(records.iter().map(ExportedClip::from).collect())
    }

    pub async fn to_json(&self) -> Result<String> {
        let clips = self.execute().await?;
        serde_json::to_string_pretty(&clips).context("Failed to serialize history")
    }

    pub async fn to_file(&self, path: &Path) -> Result<usize> {
        let clips = self.execute().await?;
        let json = serde_json::to_string_pretty(&clips).context("Failed to serialize history")?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write export file: {}", path.display()))?;
        info!(count = clips.len(), path = %path.display(), "History exported");
        Ok(clips.len())
    }
}
