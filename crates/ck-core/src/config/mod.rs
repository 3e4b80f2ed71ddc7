//! # Pure Data Module / 纯数据模块
//!
//! TOML → [`AppConfig`] mapping for the bootstrap configuration file.
//!
//! This module holds data only. Missing keys become empty values; path
//! resolution and defaults happen where the config is consumed.
//! 此模块只包含数据结构；缺失的键映射为空值，默认值由使用方决定。

use std::path::PathBuf;

/// Bootstrap configuration DTO (pure data, no logic)
/// 启动配置 DTO（纯数据，无逻辑）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// `[storage] database_path`; empty means "use the default location".
    pub database_path: PathBuf,

    /// `[settings] path`
    pub settings_path: PathBuf,

    /// `[logging] dir`
    pub log_dir: PathBuf,
}

impl AppConfig {
    /// All paths empty.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Map a parsed TOML document. Never validates; unknown keys are ignored.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        Ok(Self {
            database_path: path_at(toml_value, "storage", "database_path"),
            settings_path: path_at(toml_value, "settings", "path"),
            log_dir: path_at(toml_value, "logging", "dir"),
        })
    }
}

fn path_at(toml_value: &toml::Value, section: &str, key: &str) -> PathBuf {
    PathBuf::from(
        toml_value
            .get(section)
            .and_then(|s| s.get(key))
            .and_then(|v| v.as_str())
            .unwrap_or(""),
    )
}
