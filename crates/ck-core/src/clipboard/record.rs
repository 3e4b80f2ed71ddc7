use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::RecordId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClipRecordError {
    #[error("clip content must not be empty")]
    EmptyContent,
}

/// A captured piece of clipboard text.
///
/// 一条已捕获的剪贴板文本记录。
///
/// # Invariants / 不变量
/// - `content` is never empty
/// - `length == content.chars().count()`
///
/// Records are never mutated after creation; they are only deleted.
/// Deserialisation goes through [`ClipRecord::new`], so a stored `length` is
/// never trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ClipRecordFields")]
pub struct ClipRecord {
    id: RecordId,
    content: String,
    captured_at_ms: i64,
    length: u64,
}

impl ClipRecord {
    /// Build a record, deriving `length` from `content`.
    pub fn new(
        id: RecordId,
        content: impl Into<String>,
        captured_at_ms: i64,
    ) -> Result<Self, ClipRecordError> {
        let content = content.into();
        if content.is_empty() {
            return Err(ClipRecordError::EmptyContent);
        }
        let length = char_length(&content);
        Ok(Self {
            id,
            content,
            captured_at_ms,
            length,
        })
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn captured_at_ms(&self) -> i64 {
        self.captured_at_ms
    }

    pub fn length(&self) -> u64 {
        self.length
    }
}

#[derive(Deserialize)]
struct ClipRecordFields {
    id: RecordId,
    content: String,
    captured_at_ms: i64,
}

impl TryFrom<ClipRecordFields> for ClipRecord {
    type Error = ClipRecordError;

    fn try_from(fields: ClipRecordFields) -> Result<Self, Self::Error> {
        ClipRecord::new(fields.id, fields.content, fields.captured_at_ms)
    }
}

/// Character length as stored on a record (Unicode scalar values).
pub fn char_length(content: &str) -> u64 {
    content.chars().count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_enforces_invariants() {
        let record: ClipRecord = serde_json::from_str(
            r#"{"id":"r1","content":"héllo","captured_at_ms":7,"length":999}"#,
        )
        .unwrap();
        assert_eq!(record.length(), 5);

        let empty = serde_json::from_str::<ClipRecord>(
            r#"{"id":"r2","content":"","captured_at_ms":7,"length":0}"#,
        );
        assert!(empty.is_err());
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let record = ClipRecord::new(RecordId::from("r"), "héllo wörld", 1).unwrap();
        assert_eq!(record.length(), 11);
        assert_eq!(record.content().len(), 13);
    }

    #[test]
    fn rejects_empty_content() {
        let err = ClipRecord::new(RecordId::from("r"), "", 1).unwrap_err();
        assert_eq!(err, ClipRecordError::EmptyContent);
    }
}
