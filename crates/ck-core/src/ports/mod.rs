//! Port interfaces for the application layer
//!
//! Ports define the contract between the capture logic and the
//! infrastructure / platform implementations, so the orchestration stays
//! independent of any concrete clipboard, shell or database.
//!
//! ## Port Placement Guidelines
//!
//! A trait belongs here when it represents a capability the core consumes
//! and the infra or platform crate implements. Seams used only inside the
//! application layer stay in `ck-app`.

mod clock;
pub mod elevated;
pub mod foreground;
pub mod history;
pub mod overlay;
pub mod settings;
mod system_clipboard;

pub use clock::ClockPort;
pub use elevated::{
    CommandOutput, ElevatedChannelError, ElevatedChannelPort, ExitInfo,
    PrivilegedClipboardService, PrivilegedServiceBinderPort,
};
pub use foreground::{ForegroundError, ForegroundLease, ForegroundPort};
pub use history::HistoryStorePort;
pub use overlay::{OverlayError, OverlayPort};
pub use settings::SettingsPort;
pub use system_clipboard::SystemClipboardPort;
