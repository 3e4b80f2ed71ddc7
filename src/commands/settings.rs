use anyhow::Result;
use ck_app::usecases::{GetSettings, SetCapturePaused};

use crate::bootstrap::AppDeps;

pub async fn show(deps: &AppDeps) -> Result<()> {
    let settings = GetSettings::new(deps.settings.clone()).execute().await?;
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}

/// Writes the flag; a running `watch` picks it up from the settings file.
pub async fn set_paused(deps: &AppDeps, paused: bool) -> Result<()> {
    SetCapturePaused::new(deps.settings.clone())
        .execute(paused)
        .await?;
    println!("capture {}", if paused { "paused" } else { "resumed" });
    Ok(())
}
