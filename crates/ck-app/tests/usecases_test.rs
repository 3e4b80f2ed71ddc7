//! History and settings use case tests
//! 历史记录与设置用例测试

mod support;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ck_app::usecases::{
    CapturePauseControl, ClearHistory, CountHistory, DeleteHistoryRecord, ExportHistory,
    GetSettings, ImportHistory, ImportReport, ListHistory, ResyncDedupGate, SearchHistory,
    SetCapturePaused, UpdateSettings,
};
use ck_core::ports::HistoryStorePort;
use ck_core::{DedupGate, ExportedClip, RecordId, Settings};
use ck_infra::FileSettingsRepository;
use support::sqlite_history;

#[tokio::test]
async fn test_export_then_import_into_empty_store() {
    let (_src_dir, source) = sqlite_history();
    source.insert_or_get_existing("first", 1_000).await.unwrap();
    source.insert_or_get_existing("second ✓", 2_000).await.unwrap();

    let exported = ExportHistory::new(source.clone()).execute().await.unwrap();
    assert_eq!(exported.len(), 2);
    assert_eq!(exported[0].content, "second ✓");
    assert_eq!(exported[0].length, 8);

    let json = ExportHistory::new(source).to_json().await.unwrap();

    let (_dst_dir, target) = sqlite_history();
    let report = ImportHistory::new(target.clone()).from_json(&json).await.unwrap();
    assert_eq!(
        report,
        ImportReport {
            processed: 2,
            added: 2,
            skipped: 0
        }
    );

    let records = target.query_all().await.unwrap();
    assert_eq!(records[0].content(), "second ✓");
    assert_eq!(records[0].captured_at_ms(), 2_000);
    assert_eq!(records[1].captured_at_ms(), 1_000);
}

#[tokio::test]
async fn test_import_rederives_length_and_skips_empty() {
    let (_dir, history) = sqlite_history();
    history.insert_or_get_existing("already here", 500).await.unwrap();

    let clips = vec![
        ExportedClip {
            content: "héllo".to_string(),
            timestamp: 10,
            length: 999,
        },
        ExportedClip {
            content: String::new(),
            timestamp: 11,
            length: 0,
        },
        ExportedClip {
            content: "already here".to_string(),
            timestamp: 12,
            length: 12,
        },
    ];
    let report = ImportHistory::new(history.clone()).execute(clips).await.unwrap();

    assert_eq!(report.processed, 3);
    assert_eq!(report.added, 1);
    assert_eq!(report.skipped, 1);

    let imported = SearchHistory::new(history.clone()).execute("HÉLLO").await.unwrap();
    // Case folding is ASCII-only, so the accented letter must match exactly.
    assert!(imported.is_empty());

    let imported = SearchHistory::new(history).execute("héllo").await.unwrap();
    assert_eq!(imported.len(), 1);
    assert_eq!(imported[0].length(), 5);
}

#[tokio::test]
async fn test_import_rejects_non_array() {
    let (_dir, history) = sqlite_history();
    let result = ImportHistory::new(history).from_json(r#"{"content":"x"}"#).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_list_limit_and_count() {
    let (_dir, history) = sqlite_history();
    for (i, text) in ["a", "b", "c"].iter().enumerate() {
        history.insert_or_get_existing(text, i as i64).await.unwrap();
    }

    let newest_two = ListHistory::new(history.clone()).execute(Some(2)).await.unwrap();
    let contents: Vec<&str> = newest_two.iter().map(|r| r.content()).collect();
    assert_eq!(contents, vec!["c", "b"]);
    assert_eq!(CountHistory::new(history).execute().await.unwrap(), 3);
}

#[tokio::test]
async fn test_delete_reports_missing_id() {
    let (_dir, history) = sqlite_history();
    let id = history.insert_or_get_existing("gone soon", 1).await.unwrap();
    let delete = DeleteHistoryRecord::new(history.clone());

    assert!(delete.execute(&id).await.unwrap());
    assert!(!delete.execute(&id).await.unwrap());
    assert!(!delete.execute(&RecordId::from("no-such-id")).await.unwrap());
}

#[tokio::test]
async fn test_clear_resets_dedup_gate() {
    let (_dir, history) = sqlite_history();
    let gate = Arc::new(DedupGate::new());
    history.insert_or_get_existing("copied", 1).await.unwrap();
    gate.record_persisted("copied");

    let deleted = ClearHistory::new(history.clone(), gate.clone())
        .execute()
        .await
        .unwrap();

    assert_eq!(deleted, 1);
    assert!(gate.should_persist("copied"));
    assert_eq!(history.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_clear_from_another_session_resets_watch_gate() {
    let (_dir, history) = sqlite_history();
    let watch_gate = Arc::new(DedupGate::new());
    history.insert_or_get_existing("copied", 1).await.unwrap();
    watch_gate.record_persisted("copied");
    let resync = ResyncDedupGate::new(history.clone(), watch_gate.clone());

    assert!(!resync.execute().await.unwrap());
    assert!(!watch_gate.should_persist("copied"));

    // `clipkeep clear` builds its own gate.
    ClearHistory::new(history.clone(), Arc::new(DedupGate::new()))
        .execute()
        .await
        .unwrap();

    assert!(resync.execute().await.unwrap());
    assert!(watch_gate.should_persist("copied"));
    assert!(!resync.execute().await.unwrap());
}

#[tokio::test]
async fn test_resync_leaves_fresh_gate_alone() {
    let (_dir, history) = sqlite_history();
    let gate = Arc::new(DedupGate::new());

    assert!(!ResyncDedupGate::new(history, gate.clone())
        .execute()
        .await
        .unwrap());
    assert!(gate.last_persisted().is_none());
}

struct FlagControl(AtomicBool);

impl CapturePauseControl for FlagControl {
    fn set_paused(&self, paused: bool) {
        self.0.store(paused, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn test_set_capture_paused_persists_and_applies() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Arc::new(FileSettingsRepository::new(dir.path().join("settings.json")));
    let control = Arc::new(FlagControl(AtomicBool::new(false)));

    SetCapturePaused::new(settings.clone())
        .with_control(control.clone())
        .execute(true)
        .await
        .unwrap();

    assert!(control.0.load(Ordering::SeqCst));
    let stored = GetSettings::new(settings.clone()).execute().await.unwrap();
    assert!(stored.capture.paused);

    SetCapturePaused::new(settings.clone()).execute(false).await.unwrap();
    let stored = GetSettings::new(settings).execute().await.unwrap();
    assert!(!stored.capture.paused);
}

#[tokio::test]
async fn test_update_settings_rejects_invalid_and_saves_valid() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Arc::new(FileSettingsRepository::new(dir.path().join("settings.json")));
    let update = UpdateSettings::new(settings.clone());

    let mut invalid = Settings::default();
    invalid.capture.burst_attempts = 0;
    assert!(update.execute(invalid).await.is_err());

    let mut valid = Settings::default();
    valid.retention.max_items = 50;
    update.execute(valid).await.unwrap();

    let stored = GetSettings::new(settings).execute().await.unwrap();
    assert_eq!(stored.retention.max_items, 50);
}
