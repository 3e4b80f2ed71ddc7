use anyhow::Result;

/// Direct access to the standard clipboard API from this process.
///
/// 当前进程对系统剪贴板的直接访问。
///
/// Reads may block and may fail whenever this process is not entitled to the
/// clipboard (not focused, sandboxed, owner gone). `Ok(None)` means the
/// clipboard holds no text.
pub trait SystemClipboardPort: Send + Sync {
    fn read_text(&self) -> Result<Option<String>>;
}
