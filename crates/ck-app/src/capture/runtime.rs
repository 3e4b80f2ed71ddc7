//! Capture orchestrator runtime
//!
//! An actor that owns the orchestration state and decides when the capture
//! pipeline runs. It reacts to three sources:
//!
//! ```text
//! poll ticker ──────────────┐
//! CaptureHandle commands ───┼──► CaptureRuntime ──► JoinSet of capture tasks ──► CapturePipeline
//! finished capture tasks ───┘
//! ```
//!
//! - **Polling**: every tick runs the background chain once, unless a capture
//!   is already in flight.
//! - **Bursting**: a clipboard change starts up to N attempts spaced by an
//!   interval, stopping once new content is persisted. A `Duplicate` does not
//!   end it, since the change may not have landed yet. Changes during a burst
//!   are absorbed by it.
//! - **OneShotCapture**: a user tap waits a grace delay, then runs the
//!   one-shot chain once. Concurrent taps share the in-flight capture.
//! - **Paused**: polling, bursts and one-shots are suppressed; a running
//!   burst stops before its next attempt.
//! - **Stopped**: scheduled work is cancelled, in-flight attempts are awaited
//!   and every pending waiter is answered.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use ck_core::capture::CaptureTrigger;
use ck_core::settings::CaptureSettings;
use ck_core::{CaptureOutcome, StrategyChain};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::{JoinError, JoinSet};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use super::pipeline::CapturePipeline;

const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrchestratorState {
    Idle,
    Polling,
    Bursting,
    OneShotCapture,
    Paused,
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub poll_interval: Duration,
    pub burst_attempts: u32,
    pub burst_interval: Duration,
    pub start_paused: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::from(&CaptureSettings::default())
    }
}

impl From<&CaptureSettings> for RuntimeConfig {
    fn from(settings: &CaptureSettings) -> Self {
        Self {
            poll_interval: settings.poll_interval(),
            burst_attempts: settings.burst_attempts.max(1),
            burst_interval: settings.burst_interval(),
            start_paused: settings.paused,
        }
    }
}

#[derive(Debug)]
enum CaptureCommand {
    ClipboardChanged,
    UserTap {
        grace: Duration,
        reply: oneshot::Sender<CaptureOutcome>,
    },
    Pause,
    Resume,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskKind {
    Poll,
    Burst,
    OneShot,
}

/// Cloneable entry point to a running [`CaptureRuntime`].
///
/// 正在运行的捕获编排器的句柄（可克隆）。
///
/// Commands are queued on an unbounded channel, so notifying never blocks
/// and is never lost to back-pressure. Once the runtime has stopped, every
/// call is a no-op and `capture_once` answers `Skipped`.
#[derive(Clone)]
pub struct CaptureHandle {
    commands: mpsc::UnboundedSender<CaptureCommand>,
    state: watch::Receiver<OrchestratorState>,
}

impl CaptureHandle {
    /// Content is never carried; the runtime always re-reads.
    pub fn notify_clipboard_changed(&self) {
        self.send(CaptureCommand::ClipboardChanged);
    }

    /// Wait `grace`, then run the one-shot chain once and return its outcome.
    pub async fn capture_once(&self, grace: Duration) -> CaptureOutcome {
        let (reply, outcome) = oneshot::channel();
        if self
            .commands
            .send(CaptureCommand::UserTap { grace, reply })
            .is_err()
        {
            return CaptureOutcome::Skipped;
        }
        outcome.await.unwrap_or(CaptureOutcome::Skipped)
    }

    pub fn pause(&self) {
        self.send(CaptureCommand::Pause);
    }

    pub fn resume(&self) {
        self.send(CaptureCommand::Resume);
    }

    /// Ask the runtime to stop and wait until it has.
    pub async fn stop(&self) {
        self.send(CaptureCommand::Stop);
        let mut state = self.state.clone();
        let _ = state
            .wait_for(|s| *s == OrchestratorState::Stopped)
            .await;
    }

    pub fn state(&self) -> OrchestratorState {
        *self.state.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<OrchestratorState> {
        self.state.clone()
    }

    fn send(&self, command: CaptureCommand) {
        if self.commands.send(command).is_err() {
            trace!("Capture runtime already stopped, command dropped");
        }
    }
}

/// The orchestrator actor. Build with [`CaptureRuntime::new`], drive with
/// [`CaptureRuntime::run`] (or [`CaptureRuntime::spawn`]).
///
/// 捕获编排器。
pub struct CaptureRuntime {
    pipeline: Arc<CapturePipeline>,
    background: Arc<StrategyChain>,
    one_shot: Arc<StrategyChain>,
    config: RuntimeConfig,
    commands: mpsc::UnboundedReceiver<CaptureCommand>,
    state_tx: watch::Sender<OrchestratorState>,
    paused: Arc<AtomicBool>,
    cancel: CancellationToken,
    tasks: JoinSet<(TaskKind, CaptureOutcome)>,
    poll_in_flight: bool,
    burst_in_flight: bool,
    one_shot_in_flight: bool,
    one_shot_waiters: Vec<oneshot::Sender<CaptureOutcome>>,
    stopped: bool,
}

impl CaptureRuntime {
    pub fn new(
        pipeline: Arc<CapturePipeline>,
        background: StrategyChain,
        one_shot: StrategyChain,
        config: RuntimeConfig,
    ) -> (Self, CaptureHandle) {
        let (commands_tx, commands) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(OrchestratorState::Idle);

        let runtime = Self {
            pipeline,
            background: Arc::new(background),
            one_shot: Arc::new(one_shot),
            paused: Arc::new(AtomicBool::new(config.start_paused)),
            config,
            commands,
            state_tx,
            cancel: CancellationToken::new(),
            tasks: JoinSet::new(),
            poll_in_flight: false,
            burst_in_flight: false,
            one_shot_in_flight: false,
            one_shot_waiters: Vec::new(),
            stopped: false,
        };
        let handle = CaptureHandle {
            commands: commands_tx,
            state: state_rx,
        };
        (runtime, handle)
    }

    /// Spawn the actor on the current tokio runtime.
    pub fn spawn(
        pipeline: Arc<CapturePipeline>,
        background: StrategyChain,
        one_shot: StrategyChain,
        config: RuntimeConfig,
    ) -> (CaptureHandle, tokio::task::JoinHandle<()>) {
        let (runtime, handle) = Self::new(pipeline, background, one_shot, config);
        let join = tokio::spawn(runtime.run());
        (handle, join)
    }

    pub async fn run(mut self) {
        info!(
            poll_ms = self.config.poll_interval.as_millis() as u64,
            burst_attempts = self.config.burst_attempts,
            paused = self.is_paused(),
            "Capture runtime started"
        );

        let period = self.config.poll_interval.max(MIN_POLL_INTERVAL);
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.publish_state();

        loop {
            tokio::select! {
                command = self.commands.recv() => {
                    match command {
                        Some(CaptureCommand::Stop) | None => break,
                        Some(command) => self.handle_command(command),
                    }
                }
                Some(done) = self.tasks.join_next(), if !self.tasks.is_empty() => {
                    self.on_task_done(done);
                }
                _ = ticker.tick() => {
                    self.on_tick();
                }
            }
        }

        self.shutdown().await;
    }

    fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    fn handle_command(&mut self, command: CaptureCommand) {
        match command {
            CaptureCommand::ClipboardChanged => self.on_clipboard_changed(),
            CaptureCommand::UserTap { grace, reply } => self.on_user_tap(grace, reply),
            CaptureCommand::Pause => {
                if !self.paused.swap(true, Ordering::AcqRel) {
                    info!("Capture paused");
                }
            }
            CaptureCommand::Resume => {
                if self.paused.swap(false, Ordering::AcqRel) {
                    info!("Capture resumed");
                }
            }
            CaptureCommand::Stop => {}
        }
        self.publish_state();
    }

    fn on_tick(&mut self) {
        if self.is_paused() || self.capture_in_flight() {
            return;
        }
        self.poll_in_flight = true;
        let pipeline = self.pipeline.clone();
        let chain = self.background.clone();
        self.spawn_task(TaskKind::Poll, async move {
            pipeline.run(&chain, CaptureTrigger::Poll).await
        });
    }

    fn on_clipboard_changed(&mut self) {
        if self.is_paused() {
            debug!("Clipboard change dropped while paused");
            return;
        }
        if self.burst_in_flight {
            trace!("Clipboard change absorbed by running burst");
            return;
        }

        self.burst_in_flight = true;
        let pipeline = self.pipeline.clone();
        let chain = self.background.clone();
        let paused = self.paused.clone();
        let cancel = self.cancel.clone();
        let attempts = self.config.burst_attempts;
        let interval = self.config.burst_interval;

        self.spawn_task(TaskKind::Burst, async move {
            let mut last = CaptureOutcome::Skipped;
            for attempt in 1..=attempts {
                if paused.load(Ordering::Acquire) || cancel.is_cancelled() {
                    debug!(attempt, "Burst interrupted");
                    break;
                }
                last = pipeline.run(&chain, CaptureTrigger::Burst { attempt }).await;
                if last.is_persisted() || attempt == attempts {
                    break;
                }
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {}
                }
            }
            last
        });
    }

    fn on_user_tap(&mut self, grace: Duration, reply: oneshot::Sender<CaptureOutcome>) {
        if self.is_paused() {
            debug!("One-shot capture skipped while paused");
            let _ = reply.send(CaptureOutcome::Skipped);
            return;
        }

        self.one_shot_waiters.push(reply);
        if self.one_shot_in_flight {
            debug!(
                waiters = self.one_shot_waiters.len(),
                "One-shot capture already running, request coalesced"
            );
            return;
        }

        self.one_shot_in_flight = true;
        let pipeline = self.pipeline.clone();
        let chain = self.one_shot.clone();
        let paused = self.paused.clone();
        let cancel = self.cancel.clone();

        self.spawn_task(TaskKind::OneShot, async move {
            tokio::select! {
                _ = cancel.cancelled() => return CaptureOutcome::Skipped,
                _ = tokio::time::sleep(grace) => {}
            }
            if paused.load(Ordering::Acquire) {
                return CaptureOutcome::Skipped;
            }
            pipeline.run(&chain, CaptureTrigger::OneShot).await
        });
    }

    fn spawn_task<F>(&mut self, kind: TaskKind, task: F)
    where
        F: Future<Output = CaptureOutcome> + Send + 'static,
    {
        self.tasks.spawn(async move {
            match AssertUnwindSafe(task).catch_unwind().await {
                Ok(outcome) => (kind, outcome),
                Err(_) => {
                    error!(task = ?kind, "Capture task panicked");
                    (kind, CaptureOutcome::Skipped)
                }
            }
        });
        self.publish_state();
    }

    fn on_task_done(&mut self, done: Result<(TaskKind, CaptureOutcome), JoinError>) {
        match done {
            Ok((TaskKind::Poll, outcome)) => {
                self.poll_in_flight = false;
                trace!(?outcome, "Poll finished");
            }
            Ok((TaskKind::Burst, outcome)) => {
                self.burst_in_flight = false;
                debug!(?outcome, "Burst finished");
            }
            Ok((TaskKind::OneShot, outcome)) => {
                self.one_shot_in_flight = false;
                debug!(?outcome, waiters = self.one_shot_waiters.len(), "One-shot finished");
                for waiter in self.one_shot_waiters.drain(..) {
                    let _ = waiter.send(outcome.clone());
                }
            }
            Err(e) => warn!(error = %e, "Capture task aborted"),
        }
        self.publish_state();
    }

    fn capture_in_flight(&self) -> bool {
        self.poll_in_flight || self.burst_in_flight || self.one_shot_in_flight
    }

    fn current_state(&self) -> OrchestratorState {
        if self.stopped {
            OrchestratorState::Stopped
        } else if self.is_paused() {
            OrchestratorState::Paused
        } else if self.one_shot_in_flight {
            OrchestratorState::OneShotCapture
        } else if self.burst_in_flight {
            OrchestratorState::Bursting
        } else {
            OrchestratorState::Polling
        }
    }

    fn publish_state(&self) {
        let next = self.current_state();
        self.state_tx.send_if_modified(|state| {
            if *state == next {
                false
            } else {
                *state = next;
                true
            }
        });
    }

    async fn shutdown(&mut self) {
        info!(in_flight = self.tasks.len(), "Capture runtime stopping");
        self.cancel.cancel();

        while let Some(done) = self.tasks.join_next().await {
            self.on_task_done(done);
        }
        for waiter in self.one_shot_waiters.drain(..) {
            let _ = waiter.send(CaptureOutcome::Skipped);
        }

        self.commands.close();
        while let Ok(command) = self.commands.try_recv() {
            if let CaptureCommand::UserTap { reply, .. } = command {
                let _ = reply.send(CaptureOutcome::Skipped);
            }
        }

        self.stopped = true;
        self.publish_state();
        info!("Capture runtime stopped");
    }
}
