use thiserror::Error;

#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("overlay permission denied")]
    PermissionDenied,

    #[error("overlay operation failed: {0}")]
    Failed(String),
}

/// The transparent, input-permeable layer drawn above all other content.
///
/// 覆盖在所有内容之上的透明触摸层。
///
/// Both operations are idempotent. Failures are reported but callers treat
/// them as non-fatal.
pub trait OverlayPort: Send + Sync {
    fn add_layer(&self) -> Result<(), OverlayError>;
    fn remove_layer(&self) -> Result<(), OverlayError>;
    fn is_attached(&self) -> bool;
}
