use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use ck_core::capture::bounded_read;
use ck_core::ports::SystemClipboardPort;
use ck_core::{CaptureResult, CaptureStrategy, StrategyId};

/// One read of the system clipboard on a blocking thread.
pub async fn read_passive(clipboard: Arc<dyn SystemClipboardPort>) -> anyhow::Result<Option<String>> {
    tokio::task::spawn_blocking(move || clipboard.read_text())
        .await
        .map_err(|e| anyhow!("clipboard read task failed: {e}"))?
}

/// Plain in-process clipboard read. Works whenever the process is entitled to
/// the clipboard at the moment of the call.
///
/// 进程内直接读取剪贴板。
pub struct PassiveStrategy {
    clipboard: Arc<dyn SystemClipboardPort>,
}

impl PassiveStrategy {
    pub fn new(clipboard: Arc<dyn SystemClipboardPort>) -> Self {
        Self { clipboard }
    }
}

#[async_trait]
impl CaptureStrategy for PassiveStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::Passive
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn attempt_read(&self, timeout: Duration) -> CaptureResult {
        bounded_read(self.id(), timeout, read_passive(self.clipboard.clone())).await
    }
}
