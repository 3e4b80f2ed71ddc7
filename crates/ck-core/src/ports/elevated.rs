use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ElevatedChannelError {
    #[error("elevated channel unavailable: {0}")]
    Unavailable(String),

    #[error("elevated access not granted")]
    PermissionDenied,

    #[error("failed to spawn elevated process: {0}")]
    Spawn(String),

    #[error("elevated channel I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("elevated helper protocol error: {0}")]
    Protocol(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitInfo {
    pub code: Option<i32>,
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit: ExitInfo,
}

/// Privileged execution path that needs a user-granted permission.
///
/// 需要用户显式授权的提权执行通道。
#[async_trait]
pub trait ElevatedChannelPort: Send + Sync {
    /// Whether the channel exists at all on this machine. Cheap.
    fn is_available(&self) -> bool;

    async fn has_permission(&self) -> bool;

    async fn request_permission(&self) -> Result<(), ElevatedChannelError>;

    /// Run `argv` with elevated rights and collect its output.
    async fn run(&self, argv: &[String]) -> Result<CommandOutput, ElevatedChannelError>;
}

/// A bound privileged helper able to query the clipboard owner directly.
#[async_trait]
pub trait PrivilegedClipboardService: Send + Sync {
    async fn primary_clip_text(&self) -> anyhow::Result<Option<String>>;
}

/// Lazily binds the privileged helper.
///
/// 延迟绑定提权辅助进程。
///
/// Binding may fail or be lost at any time. That is a recoverable
/// "not available right now", never a fatal error.
#[async_trait]
pub trait PrivilegedServiceBinderPort: Send + Sync {
    fn is_bound(&self) -> bool;

    /// Whether binding could succeed (channel present). Cheap.
    fn can_bind(&self) -> bool;

    async fn bind(&self) -> Result<Arc<dyn PrivilegedClipboardService>, ElevatedChannelError>;

    /// Drop the current binding after a failed call.
    async fn invalidate(&self);
}
