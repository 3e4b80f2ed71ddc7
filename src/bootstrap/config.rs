//! # Configuration Loader / 配置加载器
//!
//! Reads the TOML bootstrap file into [`AppConfig`]. Pure data loading:
//! missing keys stay empty and are resolved later by `AppPaths`.
//! 仅负责读取与解析，不做验证也不计算默认值。

use std::path::{Path, PathBuf};

use anyhow::Context;
use ck_core::config::AppConfig;

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// # Errors / 错误
///
/// Returns error if the file cannot be read or is not valid TOML.
pub fn load_config(config_path: PathBuf) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// An explicit path must exist; otherwise `<data_root>/config.toml` is used
/// when present and an empty config when not.
pub fn load_app_config(explicit: Option<PathBuf>, data_root: &Path) -> anyhow::Result<AppConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    let default_path = data_root.join(CONFIG_FILE_NAME);
    if default_path.exists() {
        load_config(default_path)
    } else {
        Ok(AppConfig::empty())
    }
}

/// `<local data dir>/clipkeep`
pub fn default_data_root() -> anyhow::Result<PathBuf> {
    dirs::data_local_dir()
        .map(|dir| dir.join("clipkeep"))
        .context("Could not determine the local data directory")
}
