use serde::{Deserialize, Serialize};

use super::record::{char_length, ClipRecord};

/// One element of the export / import JSON array.
///
/// 导出/导入 JSON 数组中的一个元素。
///
/// `length` is written on export for readers of the file, but import always
/// re-derives it from `content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedClip {
    pub content: String,
    pub timestamp: i64,
    #[serde(default)]
    pub length: u64,
}

impl From<&ClipRecord> for ExportedClip {
    fn from(record: &ClipRecord) -> Self {
        Self {
            content: record.content().to_string(),
            timestamp: record.captured_at_ms(),
            length: record.length(),
        }
    }
}

impl ExportedClip {
    pub fn derived_length(&self) -> u64 {
        char_length(&self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_length_deserializes_as_zero() {
        let clip: ExportedClip =
            serde_json::from_str(r#"{"content":"abc","timestamp":5}"#).unwrap();
        assert_eq!(clip.length, 0);
        assert_eq!(clip.derived_length(), 3);
    }
}
