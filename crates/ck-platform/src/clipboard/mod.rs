mod local;
mod watcher;

pub use local::LocalClipboard;
pub use watcher::ClipboardChangeWatcher;
