use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use ck_core::ports::{OverlayError, OverlayPort};
use tracing::debug;

/// Overlay for sessions without a drawable layer. Tracks attachment only.
///
/// 无界面环境下的覆盖层，仅记录挂载状态。
#[derive(Debug, Default)]
pub struct HeadlessOverlay {
    attached: AtomicBool,
    attach_count: AtomicU64,
}

impl HeadlessOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times the layer went from detached to attached.
    pub fn attach_count(&self) -> u64 {
        self.attach_count.load(Ordering::Acquire)
    }
}

impl OverlayPort for HeadlessOverlay {
    fn add_layer(&self) -> Result<(), OverlayError> {
        if !self.attached.swap(true, Ordering::AcqRel) {
            self.attach_count.fetch_add(1, Ordering::AcqRel);
            debug!("Overlay layer added");
        }
        Ok(())
    }

    fn remove_layer(&self) -> Result<(), OverlayError> {
        if self.attached.swap(false, Ordering::AcqRel) {
            debug!("Overlay layer removed");
        }
        Ok(())
    }

    fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }
}
