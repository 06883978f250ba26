use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::AbortHandle;

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(1000);

/// Holds at most one pending action. Only the timer is cancellable: once the
/// quiet period elapses the action runs as its own task.
pub struct QueryDebouncer {
    quiet_period: Duration,
    pending: Mutex<Option<AbortHandle>>,
}

impl Default for QueryDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl QueryDebouncer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: Mutex::new(None),
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    pub async fn schedule<F, Fut>(&self, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut pending = self.pending.lock().await;
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        let quiet_period = self.quiet_period;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            tokio::spawn(action());
        });
        *pending = Some(timer.abort_handle());
    }

    /// Returns true when a pending timer was cancelled before firing.
    pub async fn cancel(&self) -> bool {
        let mut pending = self.pending.lock().await;
        match pending.take() {
            Some(timer) if !timer.is_finished() => {
                timer.abort();
                true
            }
            _ => false,
        }
    }

    pub async fn has_pending(&self) -> bool {
        self.pending
            .lock()
            .await
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }
}

impl Drop for QueryDebouncer {
    fn drop(&mut self) {
        if let Some(timer) = self.pending.get_mut().take() {
            timer.abort();
        }
    }
}
