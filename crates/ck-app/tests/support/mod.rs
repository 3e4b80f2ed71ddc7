//! Shared fakes for ck-app integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use ck_app::capture::CapturePipeline;
use ck_app::{CaptureHandle, OrchestratorState};
use ck_core::ports::{ClockPort, HistoryStorePort, OverlayError, OverlayPort};
use ck_core::{CaptureResult, CaptureStrategy, ClipRecord, DedupGate, RecordId, StrategyId};
use ck_infra::db::mappers::ClipRecordRowMapper;
use ck_infra::db::pool::init_db_pool;
use ck_infra::db::repositories::DieselHistoryRepository;
use ck_infra::db::DieselSqliteExecutor;
use tempfile::TempDir;

pub type EventLog = Arc<Mutex<Vec<&'static str>>>;

/// A clipboard channel whose content the test controls.
///
/// The first `misses` reads return nothing, which models a clipboard that is
/// not readable yet right after a change. Queued reads are returned before
/// the current content, which models a clipboard still showing its previous
/// value.
pub struct FakeClipboard {
    id: StrategyId,
    content: Mutex<Option<String>>,
    queued: Mutex<VecDeque<String>>,
    misses: AtomicUsize,
    calls: AtomicUsize,
    read_delay: Mutex<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    events: Option<EventLog>,
}

impl FakeClipboard {
    pub fn new(id: StrategyId) -> Arc<Self> {
        Arc::new(Self::build(id, None))
    }

    pub fn with_events(id: StrategyId, events: EventLog) -> Arc<Self> {
        Arc::new(Self::build(id, Some(events)))
    }

    fn build(id: StrategyId, events: Option<EventLog>) -> Self {
        Self {
            id,
            content: Mutex::new(None),
            queued: Mutex::new(VecDeque::new()),
            misses: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
            read_delay: Mutex::new(Duration::ZERO),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            events,
        }
    }

    pub fn queue_reads(&self, reads: &[&str]) {
        self.queued
            .lock()
            .unwrap()
            .extend(reads.iter().map(|r| r.to_string()));
    }

    /// Every read takes this long before answering.
    pub fn set_read_delay(&self, delay: Duration) {
        *self.read_delay.lock().unwrap() = delay;
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of reads ever running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn set(&self, text: &str) {
        *self.content.lock().unwrap() = Some(text.to_string());
    }

    pub fn miss_next(&self, n: usize) {
        self.misses.store(n, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CaptureStrategy for FakeClipboard {
    fn id(&self) -> StrategyId {
        self.id
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn attempt_read(&self, _timeout: Duration) -> CaptureResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(events) = &self.events {
            events.lock().unwrap().push("capture");
        }
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        let delay = *self.read_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(queued) = self.queued.lock().unwrap().pop_front() {
            return CaptureResult::new(self.id, Some(queued));
        }
        let missed = self
            .misses
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if missed {
            return CaptureResult::none(self.id);
        }
        CaptureResult::new(self.id, self.content.lock().unwrap().clone())
    }
}

/// In-memory history with the same dedup rules as the SQLite store.
#[derive(Default)]
pub struct MemoryHistory {
    records: Mutex<Vec<ClipRecord>>,
}

impl MemoryHistory {
    pub fn contents(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.content().to_string())
            .collect()
    }
}

#[async_trait]
impl HistoryStorePort for MemoryHistory {
    async fn insert_or_get_existing(&self, content: &str, captured_at_ms: i64) -> Result<RecordId> {
        let mut records = self.records.lock().unwrap();
        if let Some(existing) = records.iter().find(|r| r.content() == content) {
            return Ok(existing.id().clone());
        }
        let record = ClipRecord::new(RecordId::new(), content, captured_at_ms)?;
        let id = record.id().clone();
        records.push(record);
        Ok(id)
    }

    async fn get(&self, id: &RecordId) -> Result<Option<ClipRecord>> {
        Ok(self.records.lock().unwrap().iter().find(|r| r.id() == id).cloned())
    }

    async fn delete_one(&self, id: &RecordId) -> Result<bool> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id() != id);
        Ok(records.len() != before)
    }

    async fn delete_all(&self) -> Result<u64> {
        let mut records = self.records.lock().unwrap();
        let n = records.len() as u64;
        records.clear();
        Ok(n)
    }

    async fn query_all(&self) -> Result<Vec<ClipRecord>> {
        let mut records = self.records.lock().unwrap().clone();
        records.sort_by(|a, b| b.captured_at_ms().cmp(&a.captured_at_ms()));
        Ok(records)
    }

    async fn query_search(&self, substring: &str) -> Result<Vec<ClipRecord>> {
        let needle = substring.to_ascii_lowercase();
        let all = self.query_all().await?;
        Ok(all
            .into_iter()
            .filter(|r| r.content().to_ascii_lowercase().contains(&needle))
            .collect())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.records.lock().unwrap().len() as u64)
    }

    async fn delete_oldest_beyond(&self, keep: u64) -> Result<u64> {
        let all = self.query_all().await?;
        let doomed: Vec<RecordId> = all.iter().skip(keep as usize).map(|r| r.id().clone()).collect();
        self.records.lock().unwrap().retain(|r| !doomed.contains(r.id()));
        Ok(doomed.len() as u64)
    }
}

/// Monotonic clock advancing one second per call.
pub struct StepClock(AtomicI64);

impl StepClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self(AtomicI64::new(1_700_000_000_000)))
    }
}

impl ClockPort for StepClock {
    fn now_ms(&self) -> i64 {
        self.0.fetch_add(1_000, Ordering::SeqCst)
    }
}

/// Overlay that appends "remove" / "add" to a shared event log.
pub struct RecordingOverlay {
    pub events: EventLog,
}

impl OverlayPort for RecordingOverlay {
    fn add_layer(&self) -> Result<(), OverlayError> {
        self.events.lock().unwrap().push("add");
        Ok(())
    }

    fn remove_layer(&self) -> Result<(), OverlayError> {
        self.events.lock().unwrap().push("remove");
        Ok(())
    }

    fn is_attached(&self) -> bool {
        self.events.lock().unwrap().last() == Some(&"add")
    }
}

pub fn memory_pipeline(history: Arc<MemoryHistory>) -> Arc<CapturePipeline> {
    Arc::new(CapturePipeline::new(
        history,
        Arc::new(DedupGate::new()),
        StepClock::new(),
    ))
}

pub type SqliteHistory =
    DieselHistoryRepository<DieselSqliteExecutor, ClipRecordRowMapper, ClipRecordRowMapper>;

/// File-backed SQLite history in a temp dir.
pub fn sqlite_history() -> (TempDir, Arc<SqliteHistory>) {
    let dir = tempfile::tempdir().expect("temp dir");
    let db_path = dir.path().join("history.db");
    let pool = init_db_pool(db_path.to_str().expect("utf-8 path")).expect("test DB pool");
    let repo = DieselHistoryRepository::new(
        DieselSqliteExecutor::new(pool),
        ClipRecordRowMapper,
        ClipRecordRowMapper,
    );
    (dir, Arc::new(repo))
}

/// Wait up to two seconds for the store to hold `n` records.
pub async fn wait_for_count(history: &dyn HistoryStorePort, n: u64) -> bool {
    for _ in 0..200 {
        if history.count().await.unwrap() == n {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

pub async fn wait_for_calls(clipboard: &FakeClipboard, n: usize) -> bool {
    for _ in 0..200 {
        if clipboard.calls() >= n {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

pub async fn wait_for_state(handle: &CaptureHandle, state: OrchestratorState) -> bool {
    let mut rx = handle.subscribe_state();
    let reached = tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|s| *s == state)).await;
    matches!(reached, Ok(Ok(_)))
}
