use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ck_core::capture::{bounded_read, truncate_error};
use ck_core::clipboard::{parse_dump, DumpFormat, ShellClipOutput};
use ck_core::ports::ElevatedChannelPort;
use ck_core::{CaptureResult, CaptureStrategy, StrategyId};
use tracing::debug;

/// Runs the clipboard dump command over the elevated channel and parses its
/// stdout.
///
/// 通过提权通道执行剪贴板转储命令并解析输出。
pub struct ElevatedShellStrategy {
    channel: Arc<dyn ElevatedChannelPort>,
    dump_command: Vec<String>,
    format: DumpFormat,
}

impl ElevatedShellStrategy {
    pub fn new(
        channel: Arc<dyn ElevatedChannelPort>,
        dump_command: Vec<String>,
        format: DumpFormat,
    ) -> Self {
        Self {
            channel,
            dump_command,
            format,
        }
    }

    async fn read(&self) -> anyhow::Result<Option<String>> {
        if !self.channel.has_permission().await {
            debug!(strategy = %self.id(), "Elevated access not granted");
            return Ok(None);
        }

        let output = self.channel.run(&self.dump_command).await?;
        if !output.exit.success {
            debug!(
                strategy = %self.id(),
                code = ?output.exit.code,
                stderr = %truncate_error(output.stderr.trim()),
                "Clipboard dump exited unsuccessfully"
            );
            return Ok(None);
        }

        match parse_dump(&output.stdout, self.format) {
            ShellClipOutput::Text(text) => Ok(Some(text)),
            ShellClipOutput::Empty => Ok(None),
            ShellClipOutput::Unrecognized => {
                // Never log the dump itself, it is clipboard content.
                debug!(
                    strategy = %self.id(),
                    bytes = output.stdout.len(),
                    "Unrecognized clipboard dump"
                );
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl CaptureStrategy for ElevatedShellStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::ElevatedShell
    }

    fn is_available(&self) -> bool {
        !self.dump_command.is_empty() && self.channel.is_available()
    }

    async fn attempt_read(&self, timeout: Duration) -> CaptureResult {
        bounded_read(self.id(), timeout, self.read()).await
    }
}
