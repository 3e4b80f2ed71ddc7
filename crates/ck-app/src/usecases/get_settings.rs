//! Use case for getting application settings
//! 获取应用设置的用例

use std::sync::Arc;

use anyhow::Result;
use ck_core::ports::SettingsPort;
use ck_core::Settings;
use tracing::{debug, info_span, Instrument};

pub struct GetSettings {
    settings: Arc<dyn SettingsPort>,
}

impl GetSettings {
    pub fn new(settings: Arc<dyn SettingsPort>) -> Self {
        Self { settings }
    }

    pub async fn execute(&self) -> Result<Settings> {
        let span = info_span!("usecase.get_settings.execute");

        async {
            let result = self.settings.load().await?;
            debug!(schema_version = result.schema_version, "Settings retrieved");
            Ok(result)
        }
        .instrument(span)
        .await
    }
}
