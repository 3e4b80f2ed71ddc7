use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ck_core::capture::bounded_read;
use ck_core::ports::PrivilegedServiceBinderPort;
use ck_core::{CaptureResult, CaptureStrategy, StrategyId};
use tracing::debug;

/// Reads through the bound privileged helper.
///
/// 通过已绑定的提权辅助进程读取剪贴板。
///
/// Binding happens lazily on the first attempt. Failing to bind is "not
/// available right now"; a failing call drops the binding so the next
/// attempt rebinds.
pub struct PrivilegedServiceStrategy {
    binder: Arc<dyn PrivilegedServiceBinderPort>,
}

impl PrivilegedServiceStrategy {
    pub fn new(binder: Arc<dyn PrivilegedServiceBinderPort>) -> Self {
        Self { binder }
    }

    async fn read(&self) -> anyhow::Result<Option<String>> {
        let service = match self.binder.bind().await {
            Ok(service) => service,
            Err(e) => {
                debug!(strategy = %self.id(), error = %e, "Privileged service unavailable");
                return Ok(None);
            }
        };

        match service.primary_clip_text().await {
            Ok(text) => Ok(text),
            Err(e) => {
                self.binder.invalidate().await;
                Err(e)
            }
        }
    }
}

#[async_trait]
impl CaptureStrategy for PrivilegedServiceStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::PrivilegedService
    }

    fn is_available(&self) -> bool {
        self.binder.is_bound() || self.binder.can_bind()
    }

    async fn attempt_read(&self, timeout: Duration) -> CaptureResult {
        bounded_read(self.id(), timeout, self.read()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ck_core::ports::{ElevatedChannelError, PrivilegedClipboardService};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FakeService {
        reply: Mutex<anyhow::Result<Option<String>>>,
    }

    #[async_trait]
    impl PrivilegedClipboardService for FakeService {
        async fn primary_clip_text(&self) -> anyhow::Result<Option<String>> {
            match &*self.reply.lock().unwrap() {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(anyhow::anyhow!("{e}")),
            }
        }
    }

    struct FakeBinder {
        service: Option<Arc<FakeService>>,
        binds: AtomicUsize,
        invalidated: AtomicBool,
    }

    impl FakeBinder {
        fn with(service: Option<FakeService>) -> Arc<Self> {
            Arc::new(Self {
                service: service.map(Arc::new),
                binds: AtomicUsize::new(0),
                invalidated: AtomicBool::new(false),
            })
        }
    }

    #[async_trait]
    impl PrivilegedServiceBinderPort for FakeBinder {
        fn is_bound(&self) -> bool {
            false
        }

        fn can_bind(&self) -> bool {
            self.service.is_some()
        }

        async fn bind(&self) -> Result<Arc<dyn PrivilegedClipboardService>, ElevatedChannelError> {
            self.binds.fetch_add(1, Ordering::SeqCst);
            match &self.service {
                Some(service) => Ok(service.clone()),
                None => Err(ElevatedChannelError::Unavailable("no helper".into())),
            }
        }

        async fn invalidate(&self) {
            self.invalidated.store(true, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn bound_service_text_is_returned() {
        let binder = FakeBinder::with(Some(FakeService {
            reply: Mutex::new(Ok(Some("secret".into()))),
        }));
        let strategy = PrivilegedServiceStrategy::new(binder.clone());

        assert!(strategy.is_available());
        let result = strategy.attempt_read(Duration::from_secs(1)).await;
        assert_eq!(result.text.as_deref(), Some("secret"));
        assert_eq!(result.source, StrategyId::PrivilegedService);
        assert!(!binder.invalidated.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn bind_failure_is_no_content() {
        let binder = FakeBinder::with(None);
        let strategy = PrivilegedServiceStrategy::new(binder.clone());

        assert!(!strategy.is_available());
        let result = strategy.attempt_read(Duration::from_secs(1)).await;
        assert!(!result.is_some());
        assert_eq!(binder.binds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn broken_connection_invalidates_binding() {
        let binder = FakeBinder::with(Some(FakeService {
            reply: Mutex::new(Err(anyhow::anyhow!("pipe closed"))),
        }));
        let strategy = PrivilegedServiceStrategy::new(binder.clone());

        let result = strategy.attempt_read(Duration::from_secs(1)).await;
        assert!(!result.is_some());
        assert!(binder.invalidated.load(Ordering::SeqCst));
    }
}
