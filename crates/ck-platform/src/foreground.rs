use std::time::Duration;

use async_trait::async_trait;
use ck_core::ports::{ForegroundError, ForegroundLease, ForegroundPort};
use tracing::debug;

/// Foreground for a desktop session process.
///
/// A process running in the user's session may already read the clipboard,
/// so the request is granted at once and the lease has nothing to release.
#[derive(Debug, Default)]
pub struct SessionForeground;

#[async_trait]
impl ForegroundPort for SessionForeground {
    async fn request_transient_foreground(
        &self,
        duration_hint: Duration,
    ) -> Result<ForegroundLease, ForegroundError> {
        debug!(hint_ms = duration_hint.as_millis() as u64, "Foreground granted");
        Ok(ForegroundLease::noop())
    }
}
