use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ck_core::overlay::{GestureKind, TapClassifier, TapThresholds, TouchSample};
use ck_core::ports::OverlayPort;
use ck_core::settings::OverlaySettings;
use ck_core::CaptureOutcome;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::capture::CaptureHandle;

/// Something that can run a single focus-steal capture on demand.
#[async_trait]
pub trait OneShotCapturePort: Send + Sync {
    async fn capture_once(&self, grace: Duration) -> CaptureOutcome;
}

#[async_trait]
impl OneShotCapturePort for CaptureHandle {
    async fn capture_once(&self, grace: Duration) -> CaptureOutcome {
        CaptureHandle::capture_once(self, grace).await
    }
}

/// What the controller did with one touch sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TouchDisposition {
    /// Overlay suspended while a capture runs; sample dropped.
    Ignored,
    /// Sequence still in progress.
    Tracking,
    /// Sequence finished as something other than a tap.
    Gesture(GestureKind),
    /// Sequence was a tap and triggered a one-shot capture.
    Captured(CaptureOutcome),
}

/// Drives the overlay layer: classifies touches and, on a tap, steps out of
/// the way so the tapped app can handle it, then captures once.
///
/// 覆盖层控制器：识别点击，点击时暂时移除覆盖层并触发一次捕获。
///
/// # Behavior / 行为
/// - On a tap: remove the layer, await `capture_once(grace)`, sleep the
///   settle delay and add the layer again, whatever the capture returned.
/// - Touches arriving during that window are ignored.
/// - Layer add/remove failures are logged and never abort the sequence.
pub struct OverlayController {
    overlay: Arc<dyn OverlayPort>,
    capture: Arc<dyn OneShotCapturePort>,
    classifier: Mutex<TapClassifier>,
    suspended: AtomicBool,
    grace: Duration,
    settle: Duration,
}

impl OverlayController {
    pub fn new(
        overlay: Arc<dyn OverlayPort>,
        capture: Arc<dyn OneShotCapturePort>,
        thresholds: TapThresholds,
        grace: Duration,
        settle: Duration,
    ) -> Self {
        Self {
            overlay,
            capture,
            classifier: Mutex::new(TapClassifier::new(thresholds)),
            suspended: AtomicBool::new(false),
            grace,
            settle,
        }
    }

    pub fn from_settings(
        overlay: Arc<dyn OverlayPort>,
        capture: Arc<dyn OneShotCapturePort>,
        settings: &OverlaySettings,
    ) -> Self {
        Self::new(
            overlay,
            capture,
            settings.tap_thresholds(),
            settings.grace_delay(),
            settings.settle_delay(),
        )
    }

    pub fn attach(&self) {
        match self.overlay.add_layer() {
            Ok(()) => info!("Overlay attached"),
            Err(e) => warn!(error = %e, "Failed to attach overlay"),
        }
    }

    pub fn detach(&self) {
        match self.overlay.remove_layer() {
            Ok(()) => info!("Overlay detached"),
            Err(e) => warn!(error = %e, "Failed to detach overlay"),
        }
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended.load(Ordering::Acquire)
    }

    pub async fn on_touch(&self, sample: TouchSample) -> TouchDisposition {
        if self.is_suspended() {
            return TouchDisposition::Ignored;
        }

        let gesture = match self.classifier.lock() {
            Ok(mut classifier) => classifier.feed(sample),
            Err(poisoned) => poisoned.into_inner().feed(sample),
        };

        match gesture {
            None => TouchDisposition::Tracking,
            Some(GestureKind::Tap) => self.capture_after_tap().await,
            Some(kind) => {
                debug!(gesture = ?kind, "Touch sequence was not a tap");
                TouchDisposition::Gesture(kind)
            }
        }
    }

    async fn capture_after_tap(&self) -> TouchDisposition {
        if self
            .suspended
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return TouchDisposition::Ignored;
        }

        if let Err(e) = self.overlay.remove_layer() {
            warn!(error = %e, "Failed to remove overlay before capture");
        }

        let outcome = self.capture.capture_once(self.grace).await;
        debug!(?outcome, "Tap capture finished");

        tokio::time::sleep(self.settle).await;
        if let Err(e) = self.overlay.add_layer() {
            warn!(error = %e, "Failed to restore overlay after capture");
        }

        self.suspended.store(false, Ordering::Release);
        TouchDisposition::Captured(outcome)
    }

    /// Feed touches from `touches` until the channel closes or `cancel` fires.
    pub async fn run(&self, mut touches: mpsc::Receiver<TouchSample>, cancel: CancellationToken) {
        loop {
            let sample = tokio::select! {
                _ = cancel.cancelled() => break,
                sample = touches.recv() => match sample {
                    Some(sample) => sample,
                    None => break,
                },
            };

            if let TouchDisposition::Captured(_) = self.on_touch(sample).await {
                // Samples queued while the layer was away belong to the tapped app.
                let mut dropped = 0usize;
                while touches.try_recv().is_ok() {
                    dropped += 1;
                }
                if dropped > 0 {
                    debug!(dropped, "Dropped touches queued during capture");
                }
            }
        }
        debug!("Overlay touch loop exited");
    }
}
