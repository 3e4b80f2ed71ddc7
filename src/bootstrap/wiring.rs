//! Dependency wiring for the clipkeep binary
//! 依赖注入：把基础设施与平台实现组装成应用层所需的端口

use std::path::Path;
use std::sync::Arc;

use ck_app::capture::strategy::{
    background_chain, one_shot_chain, ElevatedShellStrategy, FocusStealStrategy,
    PassiveStrategy, PrivilegedServiceStrategy,
};
use ck_app::AppPaths;
use ck_core::ports::{ClockPort, HistoryStorePort, SettingsPort, SystemClipboardPort};
use ck_core::{DedupGate, Settings, StrategyChain};
use ck_infra::db::mappers::ClipRecordRowMapper;
use ck_infra::db::pool::{init_db_pool, DbPool};
use ck_infra::db::repositories::DieselHistoryRepository;
use ck_infra::db::DieselSqliteExecutor;
use ck_infra::{FileSettingsRepository, SystemClock};
use ck_platform::{CommandElevatedChannel, HelperProcessBinder, LocalClipboard, SessionForeground};
use tracing::info;

/// Result type for wiring operations
pub type WiringResult<T> = Result<T, WiringError>;

/// Errors during dependency injection
/// 依赖注入错误（基础设施初始化失败）
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("Database initialization failed: {0}")]
    DatabaseInit(String),

    #[error("Clipboard initialization failed: {0}")]
    ClipboardInit(String),
}

/// Ports shared by every command.
pub struct AppDeps {
    pub paths: AppPaths,
    pub history: Arc<dyn HistoryStorePort>,
    pub settings: Arc<dyn SettingsPort>,
    pub clock: Arc<dyn ClockPort>,
    pub gate: Arc<DedupGate>,
}

/// Strategy chains for the orchestrator, only built by `watch`.
pub struct CaptureLayer {
    pub clipboard: Arc<dyn SystemClipboardPort>,
    pub background: StrategyChain,
    pub one_shot: StrategyChain,
}

/// Create SQLite database connection pool
/// 创建 SQLite 数据库连接池
///
/// Creates the parent directory and runs pending migrations.
fn create_db_pool(db_path: &Path) -> WiringResult<DbPool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            WiringError::DatabaseInit(format!("Failed to create DB directory: {}", e))
        })?;
    }

    let db_url = db_path
        .to_str()
        .ok_or_else(|| WiringError::DatabaseInit("Invalid database path".to_string()))?;

    init_db_pool(db_url)
        .map_err(|e| WiringError::DatabaseInit(format!("Failed to initialize DB: {:#}", e)))
}

pub fn wire_dependencies(paths: AppPaths) -> WiringResult<AppDeps> {
    let db_pool = create_db_pool(&paths.db_path)?;
    let history: Arc<dyn HistoryStorePort> = Arc::new(DieselHistoryRepository::new(
        DieselSqliteExecutor::new(db_pool),
        ClipRecordRowMapper,
        ClipRecordRowMapper,
    ));
    let settings: Arc<dyn SettingsPort> =
        Arc::new(FileSettingsRepository::new(paths.settings_path.clone()));

    info!(
        db = %paths.db_path.display(),
        settings = %paths.settings_path.display(),
        "Dependencies wired"
    );

    Ok(AppDeps {
        paths,
        history,
        settings,
        clock: Arc::new(SystemClock),
        gate: Arc::new(DedupGate::new()),
    })
}

/// Build both strategy chains from the current settings.
pub fn create_capture_layer(settings: &Settings) -> WiringResult<CaptureLayer> {
    let clipboard: Arc<dyn SystemClipboardPort> = Arc::new(
        LocalClipboard::new().map_err(|e| WiringError::ClipboardInit(format!("{:#}", e)))?,
    );
    let elevated = &settings.elevated;

    let helper_argv: Vec<String> = elevated
        .launcher
        .iter()
        .chain(elevated.helper_command.iter())
        .cloned()
        .collect();
    let privileged = Arc::new(PrivilegedServiceStrategy::new(Arc::new(
        HelperProcessBinder::new(helper_argv),
    )));

    let channel = Arc::new(CommandElevatedChannel::new(
        elevated.launcher.clone(),
        elevated.permission_probe.clone(),
    ));
    let elevated_shell = Arc::new(ElevatedShellStrategy::new(
        channel,
        elevated.dump_command.clone(),
        elevated.dump_format,
    ));

    let passive = Arc::new(PassiveStrategy::new(clipboard.clone()));
    let focus_steal = Arc::new(FocusStealStrategy::new(
        Arc::new(SessionForeground),
        clipboard.clone(),
        settings.capture.one_shot_attempts,
        settings.capture.one_shot_interval(),
    ));

    Ok(CaptureLayer {
        clipboard,
        background: background_chain(&settings.capture, privileged, elevated_shell, passive),
        one_shot: one_shot_chain(&settings.capture, focus_steal),
    })
}
