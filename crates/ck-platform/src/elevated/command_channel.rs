use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use ck_core::ports::{CommandOutput, ElevatedChannelError, ElevatedChannelPort, ExitInfo};
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::backoff::RetryBackoff;

/// Locate `program` the way a shell would: as given when it contains a path
/// separator, otherwise on `PATH`.
pub fn resolve_program(program: &str) -> Option<PathBuf> {
    if program.is_empty() {
        return None;
    }
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(program))
        .find(|full| full.is_file())
}

/// Runs commands behind a launcher such as `sudo -n`.
///
/// 通过提权启动器（如 `sudo -n`）执行命令。
///
/// An empty launcher runs commands directly. Permission is probed by running
/// a harmless command through the launcher; a positive answer is cached until
/// an elevated command fails. A refusal is cached too, with exponential
/// backoff, so a launcher that needs a password is not re-run on every read.
pub struct CommandElevatedChannel {
    launcher: Vec<String>,
    permission_probe: Vec<String>,
    granted: AtomicBool,
    probe_backoff: RetryBackoff,
}

impl CommandElevatedChannel {
    pub fn new(launcher: Vec<String>, permission_probe: Vec<String>) -> Self {
        Self {
            launcher,
            permission_probe,
            granted: AtomicBool::new(false),
            probe_backoff: RetryBackoff::new(),
        }
    }

    fn command_for(&self, argv: &[String]) -> Result<Command, ElevatedChannelError> {
        let mut full = self.launcher.iter().chain(argv.iter());
        let program = full
            .next()
            .ok_or_else(|| ElevatedChannelError::Spawn("empty command".to_string()))?;
        let mut command = Command::new(program);
        command.args(full).kill_on_drop(true);
        Ok(command)
    }
}

#[async_trait]
impl ElevatedChannelPort for CommandElevatedChannel {
    fn is_available(&self) -> bool {
        match self.launcher.first() {
            Some(program) => resolve_program(program).is_some(),
            None => true,
        }
    }

    async fn has_permission(&self) -> bool {
        if self.granted.load(Ordering::Acquire) {
            return true;
        }
        if !self.is_available() || !self.probe_backoff.is_ready() {
            return false;
        }
        match self.run(&self.permission_probe).await {
            Ok(output) if output.exit.success => {
                self.granted.store(true, Ordering::Release);
                self.probe_backoff.record_success();
                true
            }
            Ok(output) => {
                let retry_in = self.probe_backoff.record_failure();
                debug!(
                    code = ?output.exit.code,
                    retry_in_ms = retry_in.as_millis() as u64,
                    "Elevation probe refused"
                );
                false
            }
            Err(e) => {
                let retry_in = self.probe_backoff.record_failure();
                debug!(
                    error = %e,
                    retry_in_ms = retry_in.as_millis() as u64,
                    "Elevation probe failed"
                );
                false
            }
        }
    }

    /// Interactive: the launcher may prompt on the controlling terminal.
    async fn request_permission(&self) -> Result<(), ElevatedChannelError> {
        if !self.is_available() {
            return Err(ElevatedChannelError::Unavailable(
                self.launcher.join(" "),
            ));
        }

        let status = self
            .command_for(&self.permission_probe)?
            .stdin(Stdio::inherit())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| ElevatedChannelError::Spawn(e.to_string()))?;

        if status.success() {
            info!("Elevated access granted");
            self.granted.store(true, Ordering::Release);
            self.probe_backoff.record_success();
            Ok(())
        } else {
            warn!(code = ?status.code(), "Elevated access refused");
            Err(ElevatedChannelError::PermissionDenied)
        }
    }

    async fn run(&self, argv: &[String]) -> Result<CommandOutput, ElevatedChannelError> {
        let output = self
            .command_for(argv)?
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
                    ElevatedChannelError::Spawn(e.to_string())
                }
                _ => ElevatedChannelError::Io(e),
            })?;

        let exit = ExitInfo {
            code: output.status.code(),
            success: output.status.success(),
        };
        if !exit.success {
            self.granted.store(false, Ordering::Release);
        }

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit,
        })
    }
}
