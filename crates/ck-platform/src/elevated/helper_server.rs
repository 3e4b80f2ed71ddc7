use std::sync::Arc;

use anyhow::{anyhow, Result};
use ck_core::capture::truncate_error;
use ck_core::ports::SystemClipboardPort;
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, info, warn};

use super::protocol::{codec, HelperRequest, HelperResponse};

/// Serve helper requests until the client closes its end.
///
/// 处理辅助进程请求，直到客户端关闭连接。
///
/// Runs on the elevated side (`clipkeep helper`). Malformed requests get an
/// error reply and the loop continues.
pub async fn serve_helper<R, W>(
    reader: R,
    writer: W,
    clipboard: Arc<dyn SystemClipboardPort>,
) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = FramedRead::new(reader, codec());
    let mut replies = FramedWrite::new(writer, codec());
    info!("Helper serving");

    while let Some(line) = lines.next().await {
        let line = line.map_err(|e| anyhow!("read request failed: {e}"))?;
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<HelperRequest>(&line) {
            Ok(HelperRequest::Ping) => HelperResponse::default(),
            Ok(HelperRequest::ReadText) => read_text(clipboard.clone()).await,
            Err(e) => {
                warn!(error = %e, "Malformed helper request");
                HelperResponse::error(format!("malformed request: {e}"))
            }
        };

        let encoded = serde_json::to_string(&response)?;
        replies
            .send(encoded)
            .await
            .map_err(|e| anyhow!("write reply failed: {e}"))?;
    }

    info!("Helper client disconnected");
    Ok(())
}

async fn read_text(clipboard: Arc<dyn SystemClipboardPort>) -> HelperResponse {
    match tokio::task::spawn_blocking(move || clipboard.read_text()).await {
        Ok(Ok(text)) => {
            debug!(has_text = text.is_some(), "Helper read clipboard");
            HelperResponse::text(text)
        }
        Ok(Err(e)) => HelperResponse::error(truncate_error(&format!("{e:#}"))),
        Err(e) => HelperResponse::error(format!("clipboard task failed: {e}")),
    }
}
