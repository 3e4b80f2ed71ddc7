use std::path::{Path, PathBuf};

use ck_core::config::AppConfig;

/// Concrete on-disk locations used by the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub db_path: PathBuf,
    pub settings_path: PathBuf,
    pub logs_dir: PathBuf,
}

impl AppPaths {
    pub fn from_data_root(root: &Path) -> Self {
        Self {
            db_path: root.join("clipkeep.db"),
            settings_path: root.join("settings.json"),
            logs_dir: root.join("logs"),
        }
    }

    /// Non-empty config paths replace the defaults derived from `root`.
    pub fn resolve(config: &AppConfig, root: &Path) -> Self {
        let defaults = Self::from_data_root(root);
        Self {
            db_path: pick(&config.database_path, defaults.db_path),
            settings_path: pick(&config.settings_path, defaults.settings_path),
            logs_dir: pick(&config.log_dir, defaults.logs_dir),
        }
    }
}

fn pick(configured: &Path, default: PathBuf) -> PathBuf {
    if configured.as_os_str().is_empty() {
        default
    } else {
        configured.to_path_buf()
    }
}
