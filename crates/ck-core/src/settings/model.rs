use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::clipboard::DumpFormat;
use crate::overlay::TapThresholds;

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Timing and toggles of the capture orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    /// 低频轮询间隔
    pub poll_interval_ms: u64,
    pub burst_attempts: u32,
    pub burst_interval_ms: u64,
    pub one_shot_attempts: u32,
    pub one_shot_interval_ms: u64,
    /// User toggle; suppresses polling, bursts and one-shots.
    pub paused: bool,
    pub privileged_timeout_ms: u64,
    pub shell_timeout_ms: u64,
    pub passive_timeout_ms: u64,
    pub focus_steal_timeout_ms: u64,
}

impl CaptureSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn burst_interval(&self) -> Duration {
        Duration::from_millis(self.burst_interval_ms)
    }

    pub fn one_shot_interval(&self) -> Duration {
        Duration::from_millis(self.one_shot_interval_ms)
    }

    pub fn privileged_timeout(&self) -> Duration {
        Duration::from_millis(self.privileged_timeout_ms)
    }

    pub fn shell_timeout(&self) -> Duration {
        Duration::from_millis(self.shell_timeout_ms)
    }

    pub fn passive_timeout(&self) -> Duration {
        Duration::from_millis(self.passive_timeout_ms)
    }

    pub fn focus_steal_timeout(&self) -> Duration {
        Duration::from_millis(self.focus_steal_timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    pub enabled: bool,
    pub tap_slop_px: f32,
    pub tap_max_duration_ms: u64,
    /// Delay before a one-shot capture starts, so the app under the tap
    /// regains the foreground first.
    pub grace_delay_ms: u64,
    /// Delay before the layer is re-added after a capture.
    pub settle_delay_ms: u64,
}

impl OverlaySettings {
    pub fn tap_thresholds(&self) -> TapThresholds {
        TapThresholds {
            slop_px: self.tap_slop_px,
            max_duration: Duration::from_millis(self.tap_max_duration_ms),
        }
    }

    pub fn grace_delay(&self) -> Duration {
        Duration::from_millis(self.grace_delay_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// Elevated channel endpoint identity and the commands run through it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevatedSettings {
    /// Program and arguments prefixed to every elevated command.
    pub launcher: Vec<String>,
    /// Clipboard dump command, parsed by the shell-output parser.
    pub dump_command: Vec<String>,
    /// `raw` for commands that print the clipboard verbatim, `auto` for
    /// labelled or structured dumps.
    pub dump_format: DumpFormat,
    /// Long-lived privileged helper speaking the line protocol on stdio.
    pub helper_command: Vec<String>,
    /// Harmless command used to check whether elevation is granted.
    pub permission_probe: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionSettings {
    /// 0 keeps everything.
    pub max_items: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "current_schema_version")]
    pub schema_version: u32,

    #[serde(default)]
    pub capture: CaptureSettings,

    #[serde(default)]
    pub overlay: OverlaySettings,

    #[serde(default)]
    pub elevated: ElevatedSettings,

    #[serde(default)]
    pub retention: RetentionSettings,
}

fn current_schema_version() -> u32 {
    CURRENT_SCHEMA_VERSION
}
