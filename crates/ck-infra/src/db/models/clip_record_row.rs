use crate::db::schema::clip_record;
use diesel::prelude::*;

#[derive(Debug, Clone, Queryable)]
#[diesel(table_name = clip_record)]
pub struct ClipRecordRow {
    pub id: String,
    pub content: String,
    pub captured_at_ms: i64,
    pub length: i64,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = clip_record)]
pub struct NewClipRecordRow {
    pub id: String,
    pub content: String,
    pub captured_at_ms: i64,
    pub length: i64,
}
