//! Use case for updating application settings
//! 更新应用设置的用例

use std::sync::Arc;

use anyhow::{bail, Result};
use ck_core::ports::SettingsPort;
use ck_core::settings::CURRENT_SCHEMA_VERSION;
use ck_core::Settings;
use tracing::{info, info_span, Instrument};

pub struct UpdateSettings {
    settings: Arc<dyn SettingsPort>,
}

impl UpdateSettings {
    pub fn new(settings: Arc<dyn SettingsPort>) -> Self {
        Self { settings }
    }

    pub async fn execute(&self, settings: Settings) -> Result<()> {
        let span = info_span!("usecase.update_settings.execute");

        async {
            validate(&settings)?;

            let old_settings = self.settings.load().await?;
            let changed = changed_sections(&old_settings, &settings);
            if changed.is_empty() {
                info!("Updating settings (no changes detected)");
            } else {
                info!(changed_sections = %changed.join(", "), "Updating settings");
            }

            self.settings.save(&settings).await?;
            info!("Settings updated successfully");
            Ok(())
        }
        .instrument(span)
        .await
    }
}

fn validate(settings: &Settings) -> Result<()> {
    if settings.schema_version != CURRENT_SCHEMA_VERSION {
        bail!(
            "Invalid schema version: expected {}, got {}",
            CURRENT_SCHEMA_VERSION,
            settings.schema_version
        );
    }
    if settings.capture.poll_interval_ms == 0 {
        bail!("capture.poll_interval_ms must be greater than zero");
    }
    if settings.capture.burst_attempts == 0 || settings.capture.one_shot_attempts == 0 {
        bail!("capture attempt counts must be at least 1");
    }
    if !(settings.overlay.tap_slop_px > 0.0) {
        bail!("overlay.tap_slop_px must be positive");
    }
    Ok(())
}

fn changed_sections(old: &Settings, new: &Settings) -> Vec<&'static str> {
    let mut changed = Vec::new();
    if old.capture != new.capture {
        changed.push("capture");
    }
    if old.overlay != new.overlay {
        changed.push("overlay");
    }
    if old.elevated != new.elevated {
        changed.push("elevated");
    }
    if old.retention != new.retention {
        changed.push("retention");
    }
    changed
}
