use crate::db::models::{ClipRecordRow, NewClipRecordRow};
use crate::db::ports::{InsertMapper, RowMapper};
use anyhow::{Context, Result};
use ck_core::{ClipRecord, RecordId};

pub struct ClipRecordRowMapper;

impl InsertMapper<ClipRecord, NewClipRecordRow> for ClipRecordRowMapper {
    fn to_row(&self, domain: &ClipRecord) -> Result<NewClipRecordRow> {
        Ok(NewClipRecordRow {
            id: domain.id().to_string(),
            content: domain.content().to_string(),
            captured_at_ms: domain.captured_at_ms(),
            length: i64::try_from(domain.length()).context("record length overflows i64")?,
        })
    }
}

impl RowMapper<ClipRecordRow, ClipRecord> for ClipRecordRowMapper {
    /// Length is re-derived from content, the stored column is informational.
    fn to_domain(&self, row: &ClipRecordRow) -> Result<ClipRecord> {
        ClipRecord::new(
            RecordId::from(row.id.clone()),
            row.content.clone(),
            row.captured_at_ms,
        )
        .with_context(|| format!("invalid clip_record row {}", row.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_round_trip_keeps_fields() {
        let record = ClipRecord::new(RecordId::from("r-1"), "héllo".to_string(), 42).unwrap();
        let new_row = ClipRecordRowMapper.to_row(&record).unwrap();
        assert_eq!(new_row.length, 5);

        let row = ClipRecordRow {
            id: new_row.id,
            content: new_row.content,
            captured_at_ms: new_row.captured_at_ms,
            length: new_row.length,
        };
        let back = ClipRecordRowMapper.to_domain(&row).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn empty_row_content_is_rejected() {
        let row = ClipRecordRow {
            id: "bad".to_string(),
            content: String::new(),
            captured_at_ms: 0,
            length: 0,
        };
        assert!(ClipRecordRowMapper.to_domain(&row).is_err());
    }
}
