//! `clipkeep watch`: the long-running capture session.
//!
//! ```text
//! ClipboardChangeWatcher ──notify──► CaptureRuntime ◄──capture_once── OverlayController ◄── touches
//!                                         ▲
//! settings.json (paused flag) ──follow────┘
//! history store (cleared?)   ──follow──► DedupGate
//! ```

use std::io::BufRead;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use ck_app::usecases::{CapturePauseControl, GetSettings, ResyncDedupGate};
use ck_app::{CaptureHandle, CapturePipeline, CaptureRuntime, OverlayController, RuntimeConfig};
use ck_core::overlay::TouchSample;
use ck_core::ports::SettingsPort;
use ck_platform::{ClipboardChangeWatcher, HeadlessOverlay};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::bootstrap::{create_capture_layer, AppDeps};

const FOLLOW_INTERVAL: Duration = Duration::from_secs(1);
const TOUCH_QUEUE: usize = 64;

pub async fn run(deps: AppDeps, touch_stdin: bool) -> Result<()> {
    let settings = GetSettings::new(deps.settings.clone()).execute().await?;
    let capture = create_capture_layer(&settings)?;

    let pipeline = Arc::new(
        CapturePipeline::new(deps.history.clone(), deps.gate.clone(), deps.clock.clone())
            .with_retention(settings.retention.max_items),
    );
    let (handle, runtime_task) = CaptureRuntime::spawn(
        pipeline,
        capture.background,
        capture.one_shot,
        RuntimeConfig::from(&settings.capture),
    );

    let notifier = handle.clone();
    let watcher = match ClipboardChangeWatcher::start(move || notifier.notify_clipboard_changed()) {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            warn!(error = %e, "Clipboard change notifications unavailable, polling only");
            None
        }
    };

    let cancel = CancellationToken::new();
    let mut tasks: Vec<JoinHandle<()>> = Vec::new();

    tasks.push(tokio::spawn(follow_other_sessions(
        deps.settings.clone(),
        ResyncDedupGate::new(deps.history.clone(), deps.gate.clone()),
        handle.clone(),
        settings.capture.paused,
        cancel.clone(),
    )));

    let overlay = if settings.overlay.enabled {
        let controller = Arc::new(OverlayController::from_settings(
            Arc::new(HeadlessOverlay::new()),
            Arc::new(handle.clone()),
            &settings.overlay,
        ));
        controller.attach();

        let (touch_tx, touch_rx) = mpsc::channel(TOUCH_QUEUE);
        if touch_stdin {
            spawn_touch_reader(touch_tx)?;
        } else {
            // No touch source on this platform; the loop idles until shutdown.
            tasks.push(tokio::spawn({
                let cancel = cancel.clone();
                async move {
                    cancel.cancelled().await;
                    drop(touch_tx);
                }
            }));
        }

        let looping = controller.clone();
        let token = cancel.clone();
        tasks.push(tokio::spawn(async move { looping.run(touch_rx, token).await }));
        Some(controller)
    } else {
        None
    };

    info!("Watching clipboard, press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");

    cancel.cancel();
    for task in tasks {
        if let Err(e) = task.await {
            warn!(error = %e, "Watch task ended abnormally");
        }
    }
    if let Some(controller) = overlay {
        controller.detach();
    }
    if let Some(watcher) = watcher {
        watcher.stop().await;
    }
    handle.stop().await;
    if let Err(e) = runtime_task.await {
        warn!(error = %e, "Capture runtime ended abnormally");
    }
    Ok(())
}

/// Apply what other `clipkeep` processes changed: pause / resume in the
/// settings file, and a cleared history.
async fn follow_other_sessions(
    settings: Arc<dyn SettingsPort>,
    resync: ResyncDedupGate,
    handle: CaptureHandle,
    mut paused: bool,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(FOLLOW_INTERVAL);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }
        match settings.load().await {
            Ok(current) if current.capture.paused != paused => {
                paused = current.capture.paused;
                handle.set_paused(paused);
            }
            Ok(_) => {}
            Err(e) => debug!(error = %e, "Settings reload failed"),
        }
        if let Err(e) = resync.execute().await {
            debug!(error = %e, "History resync failed");
        }
    }
}

/// JSON lines like `{"phase":"down","x":10.0,"y":20.0,"at_ms":1000}`.
///
/// Runs on a plain thread: a pending stdin read must not hold up runtime
/// shutdown.
fn spawn_touch_reader(touches: mpsc::Sender<TouchSample>) -> Result<()> {
    std::thread::Builder::new()
        .name("clipkeep-touch-input".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        warn!(error = %e, "Touch input unreadable");
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<TouchSample>(&line) {
                    Ok(sample) => {
                        if touches.blocking_send(sample).is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!(error = %e, "Ignoring malformed touch sample"),
                }
            }
            debug!("Touch input closed");
        })?;
    Ok(())
}
