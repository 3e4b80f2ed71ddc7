mod defaults;
pub mod model;

pub use model::{
    CaptureSettings, ElevatedSettings, OverlaySettings, RetentionSettings, Settings,
    CURRENT_SCHEMA_VERSION,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"capture":{"paused":true,"burst_attempts":3}}"#).unwrap();

        assert!(settings.capture.paused);
        assert_eq!(settings.capture.burst_attempts, 3);
        assert_eq!(settings.capture.poll_interval_ms, 500);
        assert_eq!(settings.overlay, OverlaySettings::default());
        assert_eq!(settings.schema_version, CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn defaults_match_capture_timing() {
        let settings = Settings::default();
        assert_eq!(settings.capture.burst_attempts, 6);
        assert_eq!(settings.capture.burst_interval().as_millis(), 120);
        assert_eq!(settings.capture.one_shot_attempts, 4);
        assert_eq!(settings.overlay.grace_delay().as_millis(), 220);
        assert_eq!(settings.overlay.settle_delay().as_millis(), 40);
        assert_eq!(settings.overlay.tap_thresholds().slop_px, 10.0);
    }

    #[test]
    fn dump_format_defaults_to_raw_for_xclip() {
        use crate::clipboard::DumpFormat;

        assert_eq!(Settings::default().elevated.dump_format, DumpFormat::Raw);
        let settings: Settings = serde_json::from_str(
            r#"{"elevated":{"dump_command":["dumpclip"],"dump_format":"auto"}}"#,
        )
        .unwrap();
        assert_eq!(settings.elevated.dump_format, DumpFormat::Auto);
        assert_eq!(settings.elevated.launcher, vec!["sudo", "-n"]);
    }
}
