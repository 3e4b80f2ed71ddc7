use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use ck_core::ports::{ElevatedChannelError, PrivilegedClipboardService, PrivilegedServiceBinderPort};
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec};
use tracing::{debug, info};

use super::backoff::RetryBackoff;
use super::command_channel::resolve_program;
use super::protocol::{codec, HelperRequest, HelperResponse};

type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;
type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// How long a freshly spawned helper has to answer the handshake ping.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(2);

struct HelperIo {
    reader: FramedRead<BoxedReader, LinesCodec>,
    writer: FramedWrite<BoxedWriter, LinesCodec>,
}

/// Client side of one helper connection.
///
/// 与提权辅助进程的一条连接（客户端）。
///
/// Requests are strictly sequential. A request that fails or is cancelled
/// midway leaves the stream out of sync, so every later request fails too and
/// the owner is expected to reconnect. Dropping the connection kills the
/// helper process if this side spawned it.
pub struct HelperConnection {
    io: Mutex<HelperIo>,
    broken: AtomicBool,
    _child: Option<Child>,
}

impl HelperConnection {
    pub fn from_io<R, W>(reader: R, writer: W) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self::with_child(Box::new(reader), Box::new(writer), None)
    }

    fn with_child(reader: BoxedReader, writer: BoxedWriter, child: Option<Child>) -> Self {
        Self {
            io: Mutex::new(HelperIo {
                reader: FramedRead::new(reader, codec()),
                writer: FramedWrite::new(writer, codec()),
            }),
            broken: AtomicBool::new(false),
            _child: child,
        }
    }

    /// Spawn `argv` with piped stdio and speak the protocol over it.
    pub fn spawn(argv: &[String]) -> Result<Self, ElevatedChannelError> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| ElevatedChannelError::Spawn("empty helper command".to_string()))?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ElevatedChannelError::Spawn(e.to_string()))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ElevatedChannelError::Protocol("helper stdin not piped".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ElevatedChannelError::Protocol("helper stdout not piped".to_string()))?;

        Ok(Self::with_child(
            Box::new(stdout),
            Box::new(stdin),
            Some(child),
        ))
    }

    pub async fn request(&self, request: &HelperRequest) -> Result<HelperResponse> {
        let line = serde_json::to_string(request).context("encode helper request")?;

        let mut io = self.io.lock().await;
        if self.broken.swap(true, Ordering::AcqRel) {
            bail!("helper connection is out of sync");
        }
        io.writer
            .send(line)
            .await
            .map_err(|e| anyhow!("send to helper failed: {e}"))?;

        let reply = match io.reader.next().await {
            Some(Ok(reply)) => reply,
            Some(Err(e)) => bail!("read from helper failed: {e}"),
            None => bail!("helper closed the connection"),
        };

        let response = serde_json::from_str(&reply)
            .with_context(|| format!("malformed helper reply: {reply}"))?;
        self.broken.store(false, Ordering::Release);
        Ok(response)
    }

    pub fn is_broken(&self) -> bool {
        self.broken.load(Ordering::Acquire)
    }

    pub async fn ping(&self) -> Result<()> {
        let response = self.request(&HelperRequest::Ping).await?;
        match response.error {
            Some(error) => Err(anyhow!("helper refused ping: {error}")),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PrivilegedClipboardService for HelperConnection {
    async fn primary_clip_text(&self) -> Result<Option<String>> {
        let response = self.request(&HelperRequest::ReadText).await?;
        if let Some(error) = response.error {
            bail!("helper error: {error}");
        }
        Ok(response.text.filter(|t| !t.is_empty()))
    }
}

/// Spawns the privileged helper on demand and keeps the connection.
///
/// 按需启动提权辅助进程并保持连接。
///
/// A failed spawn or handshake backs off exponentially; until the delay has
/// passed `can_bind` reports false and nothing is spawned.
pub struct HelperProcessBinder {
    command: Vec<String>,
    connection: Mutex<Option<Arc<HelperConnection>>>,
    bound: AtomicBool,
    backoff: RetryBackoff,
}

impl HelperProcessBinder {
    /// `command` is the complete argv, launcher included.
    pub fn new(command: Vec<String>) -> Self {
        Self {
            command,
            connection: Mutex::new(None),
            bound: AtomicBool::new(false),
            backoff: RetryBackoff::new(),
        }
    }

    async fn connect(&self) -> Result<HelperConnection, ElevatedChannelError> {
        let connection = HelperConnection::spawn(&self.command)?;
        match tokio::time::timeout(HANDSHAKE_TIMEOUT, connection.ping()).await {
            Ok(Ok(())) => Ok(connection),
            Ok(Err(e)) => Err(ElevatedChannelError::Protocol(format!("{e:#}"))),
            Err(_) => Err(ElevatedChannelError::Protocol(
                "helper handshake timed out".to_string(),
            )),
        }
    }
}

#[async_trait]
impl PrivilegedServiceBinderPort for HelperProcessBinder {
    fn is_bound(&self) -> bool {
        self.bound.load(Ordering::Acquire)
    }

    fn can_bind(&self) -> bool {
        let resolvable = self
            .command
            .first()
            .map(|program| resolve_program(program).is_some())
            .unwrap_or(false);
        resolvable && self.backoff.is_ready()
    }

    async fn bind(&self) -> Result<Arc<dyn PrivilegedClipboardService>, ElevatedChannelError> {
        let mut slot = self.connection.lock().await;
        if let Some(existing) = slot.as_ref() {
            let service: Arc<dyn PrivilegedClipboardService> = existing.clone();
            return Ok(service);
        }

        if !self.can_bind() {
            return Err(ElevatedChannelError::Unavailable(self.command.join(" ")));
        }

        let connection = match self.connect().await {
            Ok(connection) => connection,
            Err(e) => {
                let retry_in = self.backoff.record_failure();
                debug!(
                    error = %e,
                    retry_in_ms = retry_in.as_millis() as u64,
                    "Privileged helper bind failed"
                );
                return Err(e);
            }
        };
        self.backoff.record_success();

        info!(command = %self.command.join(" "), "Privileged helper bound");
        let connection = Arc::new(connection);
        *slot = Some(connection.clone());
        self.bound.store(true, Ordering::Release);
        let service: Arc<dyn PrivilegedClipboardService> = connection;
        Ok(service)
    }

    async fn invalidate(&self) {
        let mut slot = self.connection.lock().await;
        if slot.take().is_some() {
            debug!("Privileged helper binding dropped");
        }
        self.bound.store(false, Ordering::Release);
    }
}
