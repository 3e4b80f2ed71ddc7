use std::path::Path;

use anyhow::Result;
use ck_app::usecases::{
    ClearHistory, CountHistory, DeleteHistoryRecord, ExportHistory, ImportHistory, ListHistory,
    SearchHistory,
};
use ck_core::{ClipRecord, RecordId};

use crate::bootstrap::AppDeps;

const PREVIEW_CHARS: usize = 60;

pub async fn list(deps: &AppDeps, limit: Option<usize>) -> Result<()> {
    let records = ListHistory::new(deps.history.clone()).execute(limit).await?;
    print_records(&records);
    Ok(())
}

pub async fn search(deps: &AppDeps, query: &str) -> Result<()> {
    let records = SearchHistory::new(deps.history.clone()).execute(query).await?;
    print_records(&records);
    Ok(())
}

pub async fn delete(deps: &AppDeps, id: &str) -> Result<()> {
    let id = RecordId::from(id);
    if DeleteHistoryRecord::new(deps.history.clone()).execute(&id).await? {
        println!("deleted {id}");
    } else {
        println!("no clip with id {id}");
    }
    Ok(())
}

pub async fn clear(deps: &AppDeps) -> Result<()> {
    let deleted = ClearHistory::new(deps.history.clone(), deps.gate.clone())
        .execute()
        .await?;
    println!("deleted {deleted} clips");
    Ok(())
}

pub async fn count(deps: &AppDeps) -> Result<()> {
    println!("{}", CountHistory::new(deps.history.clone()).execute().await?);
    Ok(())
}

pub async fn export(deps: &AppDeps, file: &Path) -> Result<()> {
    let written = ExportHistory::new(deps.history.clone()).to_file(file).await?;
    println!("exported {written} clips to {}", file.display());
    Ok(())
}

pub async fn import(deps: &AppDeps, file: &Path) -> Result<()> {
    let report = ImportHistory::new(deps.history.clone()).from_file(file).await?;
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}

fn print_records(records: &[ClipRecord]) {
    for record in records {
        println!(
            "{}\t{}\t{}\t{}",
            record.id(),
            record.captured_at_ms(),
            record.length(),
            preview(record.content())
        );
    }
}

/// Single-line preview: newlines and tabs escaped, long text cut.
fn preview(content: &str) -> String {
    let mut out = String::new();
    for (i, ch) in content.chars().enumerate() {
        if i == PREVIEW_CHARS {
            out.push('…');
            break;
        }
        match ch {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}
