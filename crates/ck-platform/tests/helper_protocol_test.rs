//! Helper client/server over an in-memory duplex stream.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use ck_core::ports::{PrivilegedClipboardService, SystemClipboardPort};
use ck_platform::elevated::protocol::{HelperRequest, HelperResponse};
use ck_platform::{serve_helper, HelperConnection};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::task::JoinHandle;

struct FakeClipboard {
    content: Mutex<Result<Option<String>, String>>,
}

impl FakeClipboard {
    fn with(content: Result<Option<String>, String>) -> Arc<Self> {
        Arc::new(Self {
            content: Mutex::new(content),
        })
    }

    fn set(&self, content: Result<Option<String>, String>) {
        *self.content.lock().unwrap() = content;
    }
}

impl SystemClipboardPort for FakeClipboard {
    fn read_text(&self) -> Result<Option<String>> {
        self.content
            .lock()
            .unwrap()
            .clone()
            .map_err(|e| anyhow::anyhow!(e))
    }
}

fn connect(clipboard: Arc<FakeClipboard>) -> (HelperConnection, JoinHandle<Result<()>>) {
    let (client, server) = tokio::io::duplex(64 * 1024);
    let (server_read, server_write) = tokio::io::split(server);
    let server_task =
        tokio::spawn(async move { serve_helper(server_read, server_write, clipboard).await });

    let (client_read, client_write) = tokio::io::split(client);
    (HelperConnection::from_io(client_read, client_write), server_task)
}

#[tokio::test]
async fn read_text_returns_clipboard_content() {
    let clipboard = FakeClipboard::with(Ok(Some("line one\nline two".to_string())));
    let (connection, _server) = connect(clipboard.clone());

    connection.ping().await.unwrap();
    assert_eq!(
        connection.primary_clip_text().await.unwrap().as_deref(),
        Some("line one\nline two")
    );

    clipboard.set(Ok(None));
    assert_eq!(connection.primary_clip_text().await.unwrap(), None);
}

#[tokio::test]
async fn clipboard_error_is_reported_to_client() {
    let clipboard = FakeClipboard::with(Err("owner is gone".to_string()));
    let (connection, _server) = connect(clipboard);

    let err = connection.primary_clip_text().await.unwrap_err();
    assert!(format!("{err:#}").contains("owner is gone"));
}

#[tokio::test]
async fn server_stops_when_client_disconnects() {
    let clipboard = FakeClipboard::with(Ok(None));
    let (connection, server) = connect(clipboard);

    connection.ping().await.unwrap();
    drop(connection);

    server.await.unwrap().unwrap();
}

#[tokio::test]
async fn client_sees_closed_helper_as_error() {
    let (client, server) = tokio::io::duplex(1024);
    drop(server);
    let (client_read, client_write) = tokio::io::split(client);
    let connection = HelperConnection::from_io(client_read, client_write);

    assert!(connection.primary_clip_text().await.is_err());
    assert!(connection.is_broken());

    let err = connection.primary_clip_text().await.unwrap_err();
    assert!(err.to_string().contains("out of sync"));
}

#[tokio::test]
async fn malformed_request_gets_error_reply() {
    let clipboard = FakeClipboard::with(Ok(Some("x".to_string())));
    let (client, server) = tokio::io::duplex(64 * 1024);
    let (server_read, server_write) = tokio::io::split(server);
    tokio::spawn(async move { serve_helper(server_read, server_write, clipboard).await });

    let (client_read, mut client_write) = tokio::io::split(client);
    let mut replies = BufReader::new(client_read).lines();

    client_write.write_all(b"{\"op\":\"explode\"}\n").await.unwrap();
    let reply: HelperResponse =
        serde_json::from_str(&replies.next_line().await.unwrap().unwrap()).unwrap();
    assert!(reply.error.unwrap().contains("malformed request"));

    let request = serde_json::to_string(&HelperRequest::ReadText).unwrap();
    client_write
        .write_all(format!("{request}\n").as_bytes())
        .await
        .unwrap();
    let reply: HelperResponse =
        serde_json::from_str(&replies.next_line().await.unwrap().unwrap()).unwrap();
    assert_eq!(reply.text.as_deref(), Some("x"));
}
