//! One module per group of CLI commands.

pub mod helper;
pub mod history;
pub mod settings;
pub mod watch;
