use anyhow::Result;
use async_trait::async_trait;

use crate::clipboard::ClipRecord;
use crate::ids::RecordId;

/// Durable clipboard history.
///
/// 持久化的剪贴板历史存储端口。
///
/// # Behavior / 行为
/// - Every operation is individually atomic and safe to call from any task.
/// - Query results are ordered newest first by `captured_at_ms`.
/// - `insert_or_get_existing` never creates two rows with byte-identical
///   content: if one exists, its id is returned and nothing is written.
#[async_trait]
pub trait HistoryStorePort: Send + Sync {
    async fn insert_or_get_existing(&self, content: &str, captured_at_ms: i64) -> Result<RecordId>;

    async fn get(&self, id: &RecordId) -> Result<Option<ClipRecord>>;

    /// Returns `false` when no record had this id.
    async fn delete_one(&self, id: &RecordId) -> Result<bool>;

    /// Returns the number of deleted records.
    async fn delete_all(&self) -> Result<u64>;

    async fn query_all(&self) -> Result<Vec<ClipRecord>>;

    /// Substring match on content (ASCII case-insensitive).
    async fn query_search(&self, substring: &str) -> Result<Vec<ClipRecord>>;

    async fn count(&self) -> Result<u64>;

    /// Keep the newest `keep` records and delete the rest.
    async fn delete_oldest_beyond(&self, keep: u64) -> Result<u64>;
}
