use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ck_core::capture::bounded_read;
use ck_core::ports::{ForegroundPort, SystemClipboardPort};
use ck_core::{CaptureResult, CaptureStrategy, StrategyId};
use tracing::debug;

use super::passive::read_passive;

/// Briefly takes the foreground, then reads passively with a short retry.
///
/// 短暂获取前台焦点后重试读取剪贴板。
///
/// Only meant for one-shot captures right after a user tap. The lease is
/// released when the attempt returns, whatever the outcome.
pub struct FocusStealStrategy {
    foreground: Arc<dyn ForegroundPort>,
    clipboard: Arc<dyn SystemClipboardPort>,
    attempts: u32,
    interval: Duration,
}

impl FocusStealStrategy {
    pub fn new(
        foreground: Arc<dyn ForegroundPort>,
        clipboard: Arc<dyn SystemClipboardPort>,
        attempts: u32,
        interval: Duration,
    ) -> Self {
        Self {
            foreground,
            clipboard,
            attempts: attempts.max(1),
            interval,
        }
    }

    async fn read(&self, hold: Duration) -> anyhow::Result<Option<String>> {
        let _lease = match self.foreground.request_transient_foreground(hold).await {
            Ok(lease) => lease,
            Err(e) => {
                debug!(strategy = %self.id(), error = %e, "Foreground not granted");
                return Ok(None);
            }
        };

        for attempt in 1..=self.attempts {
            match read_passive(self.clipboard.clone()).await {
                Ok(Some(text)) if !text.trim().is_empty() => return Ok(Some(text)),
                Ok(_) => debug!(strategy = %self.id(), attempt, "Clipboard not readable yet"),
                Err(e) => debug!(strategy = %self.id(), attempt, error = %e, "Clipboard read failed"),
            }
            if attempt < self.attempts {
                tokio::time::sleep(self.interval).await;
            }
        }

        Ok(None)
    }
}

#[async_trait]
impl CaptureStrategy for FocusStealStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::FocusSteal
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn attempt_read(&self, timeout: Duration) -> CaptureResult {
        bounded_read(self.id(), timeout, self.read(timeout)).await
    }
}
