use super::model::*;
use crate::clipboard::DumpFormat;

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            burst_attempts: 6,
            burst_interval_ms: 120,
            one_shot_attempts: 4,
            one_shot_interval_ms: 120,
            paused: false,
            privileged_timeout_ms: 1_200,
            shell_timeout_ms: 5_000,
            passive_timeout_ms: 1_200,
            focus_steal_timeout_ms: 3_000,
        }
    }
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            tap_slop_px: 10.0,
            tap_max_duration_ms: 220,
            grace_delay_ms: 220,
            settle_delay_ms: 40,
        }
    }
}

impl Default for ElevatedSettings {
    fn default() -> Self {
        Self {
            launcher: vec!["sudo".to_string(), "-n".to_string()],
            dump_command: vec![
                "xclip".to_string(),
                "-selection".to_string(),
                "clipboard".to_string(),
                "-o".to_string(),
            ],
            dump_format: DumpFormat::Raw,
            helper_command: vec!["clipkeep".to_string(), "helper".to_string()],
            permission_probe: vec!["true".to_string()],
        }
    }
}

impl Default for RetentionSettings {
    fn default() -> Self {
        Self { max_items: 0 }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            capture: CaptureSettings::default(),
            overlay: OverlaySettings::default(),
            elevated: ElevatedSettings::default(),
            retention: RetentionSettings::default(),
        }
    }
}
