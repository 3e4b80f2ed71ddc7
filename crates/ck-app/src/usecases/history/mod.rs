//! Clipboard history use cases
//! 剪贴板历史相关用例

mod clear_history;
mod count_history;
mod delete_history_record;
mod export_history;
mod import_history;
mod list_history;
mod resync_dedup_gate;
mod search_history;

pub use clear_history::ClearHistory;
pub use count_history::CountHistory;
pub use delete_history_record::DeleteHistoryRecord;
pub use export_history::ExportHistory;
pub use import_history::{ImportHistory, ImportReport};
pub use list_history::ListHistory;
pub use resync_dedup_gate::ResyncDedupGate;
pub use search_history::SearchHistory;
