use std::sync::Arc;

use anyhow::Result;
use ck_platform::{serve_helper, LocalClipboard};
use tracing::info;

/// Privileged side of the helper protocol. Requests come on stdin, replies
/// go to stdout; the process exits when the client closes stdin.
pub async fn run() -> Result<()> {
    let clipboard = Arc::new(LocalClipboard::new()?);
    serve_helper(tokio::io::stdin(), tokio::io::stdout(), clipboard).await?;
    info!("Helper client disconnected");
    Ok(())
}
