use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use ck_core::capture::{truncate_error, CaptureTrigger};
use ck_core::ports::{ClockPort, HistoryStorePort};
use ck_core::{CaptureOutcome, CaptureResult, DedupGate, StrategyChain, StrategyId};
use tokio::sync::Mutex;
use tracing::{debug, info, info_span, trace, warn, Instrument};

/// Read → dedup → persist, one pass at a time.
///
/// 读取 → 去重 → 持久化，串行执行。
///
/// # Behavior / 行为
/// - Strategies of the chain are tried in rank order; the first one that
///   returns text wins and the rest are not called.
/// - A single async mutex covers the whole pass, so at most one strategy read
///   is outstanding across all triggers and the dedup gate moves linearly.
/// - The gate is only updated after the store accepted the text. A failed
///   insert leaves it untouched so the same text is retried later.
pub struct CapturePipeline {
    history: Arc<dyn HistoryStorePort>,
    gate: Arc<DedupGate>,
    clock: Arc<dyn ClockPort>,
    max_items: AtomicU64,
    lock: Mutex<()>,
}

impl CapturePipeline {
    pub fn new(
        history: Arc<dyn HistoryStorePort>,
        gate: Arc<DedupGate>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            history,
            gate,
            clock,
            max_items: AtomicU64::new(0),
            lock: Mutex::new(()),
        }
    }

    /// Keep at most `max_items` records after each new capture; 0 disables pruning.
    pub fn with_retention(self, max_items: u64) -> Self {
        self.max_items.store(max_items, Ordering::Release);
        self
    }

    pub fn set_retention(&self, max_items: u64) {
        self.max_items.store(max_items, Ordering::Release);
    }

    pub fn gate(&self) -> &Arc<DedupGate> {
        &self.gate
    }

    pub async fn run(&self, chain: &StrategyChain, trigger: CaptureTrigger) -> CaptureOutcome {
        let span = info_span!("capture.pipeline", trigger = %trigger);
        async {
            let _guard = self.lock.lock().await;

            let Some(result) = read_first(chain).await else {
                trace!("No strategy produced content");
                return CaptureOutcome::Empty;
            };

            match result.text {
                Some(text) => self.persist(text, result.source).await,
                None => CaptureOutcome::Empty,
            }
        }
        .instrument(span)
        .await
    }

    async fn persist(&self, text: String, source: StrategyId) -> CaptureOutcome {
        if !self.gate.should_persist(&text) {
            debug!(strategy = %source, "Same as last persisted content");
            return CaptureOutcome::Duplicate { source };
        }

        let captured_at_ms = self.clock.now_ms();
        match self
            .history
            .insert_or_get_existing(&text, captured_at_ms)
            .await
        {
            Ok(id) => {
                self.gate.record_persisted(&text);
                info!(
                    record_id = %id,
                    strategy = %source,
                    chars = text.chars().count(),
                    "Clip persisted"
                );
                self.apply_retention().await;
                CaptureOutcome::Persisted { id, source }
            }
            Err(e) => {
                warn!(
                    strategy = %source,
                    error = %truncate_error(&format!("{e:#}")),
                    "Failed to persist clip"
                );
                CaptureOutcome::PersistFailed { source }
            }
        }
    }

    async fn apply_retention(&self) {
        let max_items = self.max_items.load(Ordering::Acquire);
        if max_items == 0 {
            return;
        }
        match self.history.delete_oldest_beyond(max_items).await {
            Ok(0) => {}
            Ok(pruned) => debug!(pruned, max_items, "Pruned old clips"),
            Err(e) => warn!(error = %e, "Failed to prune old clips"),
        }
    }
}

async fn read_first(chain: &StrategyChain) -> Option<CaptureResult> {
    for entry in chain.iter() {
        let strategy = &entry.strategy;
        if !strategy.is_available() {
            trace!(strategy = %strategy.id(), "Strategy unavailable, skipped");
            continue;
        }
        let result = strategy.attempt_read(entry.timeout).await;
        if result.is_some() {
            return Some(result);
        }
    }
    None
}
