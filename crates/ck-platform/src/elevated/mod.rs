//! Elevated execution: the command channel used by the shell strategy, and the
//! long-lived privileged helper used by the privileged-service strategy.

mod backoff;
mod command_channel;
mod helper_client;
mod helper_server;
pub mod protocol;

pub use backoff::RetryBackoff;
pub use command_channel::{resolve_program, CommandElevatedChannel};
pub use helper_client::{HelperConnection, HelperProcessBinder};
pub use helper_server::serve_helper;
