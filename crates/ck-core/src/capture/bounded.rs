use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use super::strategy::{CaptureResult, StrategyId};

const MAX_LOGGED_ERROR_CHARS: usize = 200;

/// Shorten an error message for logging, on a character boundary.
pub fn truncate_error(message: &str) -> String {
    if message.chars().count() <= MAX_LOGGED_ERROR_CHARS {
        return message.to_string();
    }
    let mut truncated: String = message.chars().take(MAX_LOGGED_ERROR_CHARS).collect();
    truncated.push('…');
    truncated
}

/// Run a raw read under `timeout` and fold every failure into "no content".
///
/// 在超时约束下执行读取，所有失败都折叠为“无内容”。
///
/// Errors are logged with the strategy id; timeouts only at debug level since
/// they are the normal outcome for a channel that is slow to answer.
pub async fn bounded_read<F>(source: StrategyId, timeout: Duration, read: F) -> CaptureResult
where
    F: Future<Output = anyhow::Result<Option<String>>>,
{
    match tokio::time::timeout(timeout, read).await {
        Ok(Ok(text)) => CaptureResult::new(source, text),
        Ok(Err(err)) => {
            warn!(
                strategy = %source,
                error = %truncate_error(&format!("{err:#}")),
                "Capture strategy failed"
            );
            CaptureResult::none(source)
        }
        Err(_) => {
            debug!(
                strategy = %source,
                timeout_ms = timeout.as_millis() as u64,
                "Capture strategy timed out"
            );
            CaptureResult::none(source)
        }
    }
}
