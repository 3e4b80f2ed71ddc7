use crate::db::models::{ClipRecordRow, NewClipRecordRow};
use crate::db::ports::DbExecutor;
use crate::db::ports::{InsertMapper, RowMapper};
use crate::db::schema::clip_record;
use anyhow::Result;
use ck_core::ports::HistoryStorePort;
use ck_core::{ClipRecord, RecordId};
use diesel::dsl::count_star;
use diesel::prelude::*;

const LIKE_ESCAPE: char = '\\';

/// Escape LIKE wildcards so the query is matched literally.
fn like_pattern(substring: &str) -> String {
    let mut pattern = String::with_capacity(substring.len() + 2);
    pattern.push('%');
    for ch in substring.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

pub struct DieselHistoryRepository<E, MI, MR> {
    executor: E,
    insert_mapper: MI,
    row_mapper: MR,
}

impl<E, MI, MR> DieselHistoryRepository<E, MI, MR> {
    pub fn new(executor: E, insert_mapper: MI, row_mapper: MR) -> Self {
        Self {
            executor,
            insert_mapper,
            row_mapper,
        }
    }
}

impl<E, MI, MR> DieselHistoryRepository<E, MI, MR>
where
    MR: RowMapper<ClipRecordRow, ClipRecord>,
{
    fn to_records(&self, rows: Vec<ClipRecordRow>) -> Result<Vec<ClipRecord>> {
        rows.iter().map(|row| self.row_mapper.to_domain(row)).collect()
    }
}

#[async_trait::async_trait]
impl<E, MI, MR> HistoryStorePort for DieselHistoryRepository<E, MI, MR>
where
    E: DbExecutor,
    MI: InsertMapper<ClipRecord, NewClipRecordRow>,
    MR: RowMapper<ClipRecordRow, ClipRecord>,
{
    async fn insert_or_get_existing(&self, content: &str, captured_at_ms: i64) -> Result<RecordId> {
        let record = ClipRecord::new(RecordId::new(), content.to_string(), captured_at_ms)?;
        let new_row = self.insert_mapper.to_row(&record)?;

        self.executor.run(|conn| {
            conn.transaction::<_, anyhow::Error, _>(|conn| {
                let existing = clip_record::table
                    .filter(clip_record::content.eq(content))
                    .select(clip_record::id)
                    .first::<String>(conn)
                    .optional()?;

                if let Some(existing_id) = existing {
                    return Ok(RecordId::from(existing_id));
                }

                diesel::insert_into(clip_record::table)
                    .values(&new_row)
                    .execute(conn)?;

                Ok(record.id().clone())
            })
        })
    }

    async fn get(&self, id: &RecordId) -> Result<Option<ClipRecord>> {
        let id_str = id.inner().as_str();
        self.executor.run(|conn| {
            let row = clip_record::table
                .filter(clip_record::id.eq(id_str))
                .first::<ClipRecordRow>(conn)
                .optional()?;

            row.map(|row| self.row_mapper.to_domain(&row)).transpose()
        })
    }

    async fn delete_one(&self, id: &RecordId) -> Result<bool> {
        let id_str = id.inner().as_str();
        self.executor.run(|conn| {
            let deleted =
                diesel::delete(clip_record::table.filter(clip_record::id.eq(id_str))).execute(conn)?;
            Ok(deleted > 0)
        })
    }

    async fn delete_all(&self) -> Result<u64> {
        self.executor.run(|conn| {
            let deleted = diesel::delete(clip_record::table).execute(conn)?;
            Ok(deleted as u64)
        })
    }

    async fn query_all(&self) -> Result<Vec<ClipRecord>> {
        let rows = self.executor.run(|conn| {
            Ok(clip_record::table
                .order(clip_record::captured_at_ms.desc())
                .load::<ClipRecordRow>(conn)?)
        })?;
        self.to_records(rows)
    }

    async fn query_search(&self, substring: &str) -> Result<Vec<ClipRecord>> {
        let pattern = like_pattern(substring);
        let rows = self.executor.run(|conn| {
            Ok(clip_record::table
                .filter(clip_record::content.like(pattern).escape(LIKE_ESCAPE))
                .order(clip_record::captured_at_ms.desc())
                .load::<ClipRecordRow>(conn)?)
        })?;
        self.to_records(rows)
    }

    async fn count(&self) -> Result<u64> {
        self.executor.run(|conn| {
            let total: i64 = clip_record::table.select(count_star()).first(conn)?;
            Ok(total as u64)
        })
    }

    async fn delete_oldest_beyond(&self, keep: u64) -> Result<u64> {
        let keep = usize::try_from(keep).unwrap_or(usize::MAX);
        self.executor.run(|conn| {
            conn.transaction::<_, anyhow::Error, _>(|conn| {
                let ids: Vec<String> = clip_record::table
                    .order(clip_record::captured_at_ms.desc())
                    .select(clip_record::id)
                    .load(conn)?;

                let doomed: Vec<String> = ids.into_iter().skip(keep).collect();
                if doomed.is_empty() {
                    return Ok(0);
                }

                let deleted = diesel::delete(clip_record::table.filter(clip_record::id.eq_any(&doomed)))
                    .execute(conn)?;
                Ok(deleted as u64)
            })
        })
    }
}
