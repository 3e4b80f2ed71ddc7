use anyhow::Result;
use ck_core::ports::SystemClipboardPort;
use clipboard_rs::{Clipboard, ClipboardContext, ContentFormat};
use std::sync::{Arc, Mutex};

/// System clipboard through clipboard-rs. Text only.
///
/// 基于 clipboard-rs 的系统剪贴板（仅文本）。
pub struct LocalClipboard {
    inner: Arc<Mutex<ClipboardContext>>,
}

impl LocalClipboard {
    pub fn new() -> Result<Self> {
        let context = ClipboardContext::new()
            .map_err(|e| anyhow::anyhow!("Failed to create clipboard context: {}", e))?;
        Ok(Self {
            inner: Arc::new(Mutex::new(context)),
        })
    }
}

impl SystemClipboardPort for LocalClipboard {
    /// Blocking. Callers on async tasks go through `spawn_blocking`.
    fn read_text(&self) -> Result<Option<String>> {
        let guard = self
            .inner
            .lock()
            .map_err(|e| anyhow::anyhow!("Failed to lock clipboard: {}", e))?;

        if !guard.has(ContentFormat::Text) {
            return Ok(None);
        }

        let text = guard
            .get_text()
            .map_err(|e| anyhow::anyhow!("Failed to read clipboard text: {}", e))?;

        Ok(Some(text).filter(|t| !t.is_empty()))
    }
}
