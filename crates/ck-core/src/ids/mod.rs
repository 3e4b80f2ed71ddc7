//! ID type wrappers for type safety.

mod id_macro;

use serde::{Deserialize, Serialize};

use id_macro::impl_id;

/// Identifier of a persisted clip record. Assigned by the history store.
///
/// 剪贴板历史记录的标识，由存储层分配。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(String);

impl_id!(RecordId);
