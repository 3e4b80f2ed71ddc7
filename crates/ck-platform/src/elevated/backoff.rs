use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

pub const INITIAL_RETRY_DELAY: Duration = Duration::from_secs(2);
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(300);

#[derive(Debug, Default)]
struct BackoffState {
    failures: u32,
    retry_at: Option<Instant>,
}

/// Remembers a failed elevation attempt so the launcher is not re-run on
/// every poll tick.
///
/// 记录失败的提权尝试，按指数退避推迟下一次尝试。
///
/// The delay doubles with each consecutive failure, from
/// `INITIAL_RETRY_DELAY` up to `MAX_RETRY_DELAY`. A success clears it.
#[derive(Debug, Default)]
pub struct RetryBackoff {
    state: Mutex<BackoffState>,
}

impl RetryBackoff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a new attempt may run now.
    pub fn is_ready(&self) -> bool {
        let state = self.lock();
        match state.retry_at {
            Some(at) => Instant::now() >= at,
            None => true,
        }
    }

    /// Returns the delay until the next allowed attempt.
    pub fn record_failure(&self) -> Duration {
        let mut state = self.lock();
        state.failures = state.failures.saturating_add(1);
        let exponent = (state.failures - 1).min(16);
        let delay = INITIAL_RETRY_DELAY
            .saturating_mul(1u32 << exponent)
            .min(MAX_RETRY_DELAY);
        state.retry_at = Some(Instant::now() + delay);
        delay
    }

    pub fn record_success(&self) {
        *self.lock() = BackoffState::default();
    }

    pub fn failures(&self) -> u32 {
        self.lock().failures
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BackoffState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn delay_doubles_and_caps() {
        let backoff = RetryBackoff::new();
        assert!(backoff.is_ready());

        assert_eq!(backoff.record_failure(), Duration::from_secs(2));
        assert!(!backoff.is_ready());
        assert_eq!(backoff.record_failure(), Duration::from_secs(4));
        assert_eq!(backoff.record_failure(), Duration::from_secs(8));
        for _ in 0..20 {
            backoff.record_failure();
        }
        assert_eq!(backoff.record_failure(), MAX_RETRY_DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn ready_again_after_delay() {
        let backoff = RetryBackoff::new();
        backoff.record_failure();

        tokio::time::advance(Duration::from_millis(1999)).await;
        assert!(!backoff.is_ready());
        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(backoff.is_ready());
    }

    #[tokio::test(start_paused = true)]
    async fn success_resets() {
        let backoff = RetryBackoff::new();
        backoff.record_failure();
        backoff.record_failure();
        backoff.record_success();

        assert!(backoff.is_ready());
        assert_eq!(backoff.failures(), 0);
        assert_eq!(backoff.record_failure(), INITIAL_RETRY_DELAY);
    }
}
