//! Toggle the user-level capture pause.
//! 暂停 / 恢复剪贴板捕获

use std::sync::Arc;

use anyhow::Result;
use ck_core::ports::SettingsPort;
use tracing::info;

use crate::capture::CaptureHandle;

/// A live orchestrator that can be paused in place.
pub trait CapturePauseControl: Send + Sync {
    fn set_paused(&self, paused: bool);
}

impl CapturePauseControl for CaptureHandle {
    fn set_paused(&self, paused: bool) {
        if paused {
            self.pause();
        } else {
            self.resume();
        }
    }
}

/// Persist the paused flag and, when a runtime is running in this process,
/// apply it right away. Other processes pick the flag up from the settings
/// file.
pub struct SetCapturePaused {
    settings: Arc<dyn SettingsPort>,
    control: Option<Arc<dyn CapturePauseControl>>,
}

impl SetCapturePaused {
    pub fn new(settings: Arc<dyn SettingsPort>) -> Self {
        Self {
            settings,
            control: None,
        }
    }

    pub fn with_control(mut self, control: Arc<dyn CapturePauseControl>) -> Self {
        self.control = Some(control);
        self
    }

    #[tracing::instrument(name = "usecase.set_capture_paused.execute", skip(self))]
    pub async fn execute(&self, paused: bool) -> Result<()> {
        let mut settings = self.settings.load().await?;
        if settings.capture.paused != paused {
            settings.capture.paused = paused;
            self.settings.save(&settings).await?;
        }

        if let Some(control) = &self.control {
            control.set_paused(paused);
        }
        info!(paused, "Capture pause flag set");
        Ok(())
    }
}
