//! # ck-platform
//!
//! Platform adapters for clipkeep: the system clipboard and its change
//! watcher, the process-based elevated channel, the privileged helper
//! (client and server side), and the desktop foreground / overlay adapters.

pub mod clipboard;
pub mod elevated;
pub mod foreground;
pub mod overlay;

pub use clipboard::{ClipboardChangeWatcher, LocalClipboard};
pub use elevated::{serve_helper, CommandElevatedChannel, HelperConnection, HelperProcessBinder};
pub use foreground::SessionForeground;
pub use overlay::HeadlessOverlay;
