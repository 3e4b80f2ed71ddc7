use anyhow::Result;
use clipboard_rs::{
    ClipboardHandler, ClipboardWatcher as RSClipboardWatcher, ClipboardWatcherContext,
    WatcherShutdown,
};
use tokio::task::JoinHandle;
use tracing::{debug, info};

struct ChangeForwarder<F> {
    on_change: F,
}

impl<F> ClipboardHandler for ChangeForwarder<F>
where
    F: Fn() + Send + 'static,
{
    fn on_clipboard_change(&mut self) {
        debug!("Clipboard change notification");
        (self.on_change)();
    }
}

/// Native clipboard change notifications.
///
/// 系统剪贴板变化通知。
///
/// Every change is forwarded as a bare signal. The content is never read
/// here; whoever receives the signal re-reads through its capture strategies.
pub struct ClipboardChangeWatcher {
    shutdown: Option<WatcherShutdown>,
    join: Option<JoinHandle<()>>,
}

impl ClipboardChangeWatcher {
    /// Start watching on a blocking thread. Must be called inside a tokio runtime.
    pub fn start<F>(on_change: F) -> Result<Self>
    where
        F: Fn() + Send + 'static,
    {
        let mut watcher_ctx = ClipboardWatcherContext::new()
            .map_err(|e| anyhow::anyhow!("Failed to create watcher context: {}", e))?;

        let shutdown = watcher_ctx
            .add_handler(ChangeForwarder { on_change })
            .get_shutdown_channel();

        let join = tokio::task::spawn_blocking(move || {
            info!("start clipboard watch");
            watcher_ctx.start_watch();
            info!("clipboard watch stopped");
        });

        Ok(Self {
            shutdown: Some(shutdown),
            join: Some(join),
        })
    }

    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            shutdown.stop();
        }
        if let Some(join) = self.join.take() {
            let _ = join.await;
        }
    }
}

impl Drop for ClipboardChangeWatcher {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            shutdown.stop();
        }
    }
}
