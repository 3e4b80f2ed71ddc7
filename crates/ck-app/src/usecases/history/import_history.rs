use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use ck_core::ports::HistoryStorePort;
use ck_core::ExportedClip;
use serde::Serialize;
use tracing::{debug, info};

/// Summary of one import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Elements read from the input.
    pub processed: usize,
    /// New rows in the store after the import.
    pub added: u64,
    /// Elements with empty content.
    pub skipped: usize,
}

/// Import a previously exported JSON array.
///
/// 导入之前导出的 JSON 数组。
///
/// # Behavior / 行为
/// - Each clip keeps its original timestamp; `length` is re-derived from the
///   content and whatever the file says is ignored.
/// - Content already in the store is matched, not duplicated, so `added`
///   counts only rows that did not exist before.
/// - Empty content is skipped.
pub struct ImportHistory {
    history: Arc<dyn HistoryStorePort>,
}

impl ImportHistory {
    pub fn new(history: Arc<dyn HistoryStorePort>) -> Self {
        Self { history }
    }

    #[tracing::instrument(name = "usecase.import_history.execute", skip(self, clips), fields(clips = clips.len()))]
    pub async fn execute(&self, clips: Vec<ExportedClip>) -> Result<ImportReport> {
        let before = self.history.count().await?;
        let mut report = ImportReport {
            processed: clips.len(),
            ..ImportReport::default()
        };

        for clip in clips {
            if clip.content.is_empty() {
                report.skipped += 1;
                continue;
            }
            if clip.length != 0 && clip.length != clip.derived_length() {
                debug!(
                    declared = clip.length,
                    derived = clip.derived_length(),
                    "Ignoring declared clip length"
                );
            }
            self.history
                .insert_or_get_existing(&clip.content, clip.timestamp)
                .await?;
        }

        let after = self.history.count().await?;
        report.added = after.saturating_sub(before);
        info!(
            processed = report.processed,
            added = report.added,
            skipped = report.skipped,
            "History imported"
        );
        Ok(report)
    }

    pub async fn from_json(&self, json: &str) -> Result<ImportReport> {
        let clips: Vec<ExportedClip> =
            serde_json::from_str(json).context("Import file is not a clip array")?;
        self.execute(clips).await
    }

    pub async fn from_file(&self, path: &Path) -> Result<ImportReport> {
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read import file: {}", path.display()))?;
        self.from_json(&json).await
    }
}
