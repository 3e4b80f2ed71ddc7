//! # ck-infra
//!
//! SQLite history store, JSON settings file and system clock for clipkeep.

pub mod db;
pub mod settings;
pub mod time;

pub use settings::FileSettingsRepository;
pub use time::SystemClock;
