use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForegroundError {
    #[error("foreground request denied: {0}")]
    Denied(String),

    #[error("foreground request failed: {0}")]
    Failed(String),
}

/// Proof that this process holds the foreground. Releases it on drop.
pub struct ForegroundLease {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl ForegroundLease {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A lease with nothing to undo (foreground was already held).
    pub fn noop() -> Self {
        Self { release: None }
    }
}

impl Drop for ForegroundLease {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for ForegroundLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForegroundLease")
            .field("releasable", &self.release.is_some())
            .finish()
    }
}

/// Capability to briefly bring the capturing process to the foreground.
///
/// 短暂将捕获进程切换到前台的能力。
///
/// Implementations should have the foreground in place when the returned
/// future resolves and hold it for roughly `duration_hint`, or until the lease
/// is dropped.
#[async_trait]
pub trait ForegroundPort: Send + Sync {
    async fn request_transient_foreground(
        &self,
        duration_hint: Duration,
    ) -> Result<ForegroundLease, ForegroundError>;
}
