//! Business logic use cases
//! 每个用例对应一次用户或系统发起的操作。
//!
//! CLI command
//!         ↓
//! history::*          → list / search / delete / clear / count / export / import / resync
//! GetSettings / UpdateSettings / SetCapturePaused → settings.json

pub mod get_settings;
pub mod history;
pub mod set_capture_paused;
pub mod update_settings;

pub use get_settings::GetSettings;
pub use history::{
    ClearHistory, CountHistory, DeleteHistoryRecord, ExportHistory, ImportHistory, ImportReport,
    ListHistory, ResyncDedupGate, SearchHistory,
};
pub use set_capture_paused::{CapturePauseControl, SetCapturePaused};
pub use update_settings::UpdateSettings;
