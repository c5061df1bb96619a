//! Cancellable debounce timer.
//!
//! A [`Debouncer`] owns at most one pending task. Scheduling new work aborts
//! the previous task, and dropping the debouncer aborts whatever is still
//! pending, so no work fires after its owner is gone.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::trace;

/// Runs work only after a quiet period without re-scheduling.
#[derive(Debug)]
pub struct Debouncer {
    /// How long input must stay quiet before the work runs.
    quiet: Duration,
    /// The currently armed task, if any.
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    /// Create a debouncer with the given quiet period.
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    #[cfg(test)]
    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Arm the timer with `work`, replacing any pending work.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let quiet = self.quiet;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            work.await;
        }));
    }

    /// Abort the pending work, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            if !handle.is_finished() {
                trace!("Cancelling pending debounced task");
            }
            handle.abort();
        }
    }

    /// Whether work is armed and has not completed yet.
    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;
    use tokio::time::Instant;

    const QUIET: Duration = Duration::from_millis(300);

    #[test]
    fn test_new_is_idle() {
        let debouncer = Debouncer::new(QUIET);
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.quiet_period(), QUIET);
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_fires_once_with_last_value() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(QUIET);

        for token in ["c", "ca", "cat"] {
            let tx = tx.clone();
            debouncer.schedule(async move {
                let _ = tx.send(token.to_string());
            });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        assert_eq!(rx.recv().await.as_deref(), Some("cat"));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_only_after_quiet_period() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(QUIET);

        let start = Instant::now();
        debouncer.schedule(async move {
            let _ = tx.send(Instant::now());
        });
        assert!(debouncer.is_pending());

        let fired_at = rx.recv().await.expect("debounced work should run");
        assert!(fired_at.duration_since(start) >= QUIET);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_work() {
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();
        let mut debouncer = Debouncer::new(QUIET);

        debouncer.schedule(async move {
            let _ = tx.send(());
        });
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_prevents_work() {
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();
        {
            let mut debouncer = Debouncer::new(QUIET);
            debouncer.schedule(async move {
                let _ = tx.send(());
            });
        }

        tokio::time::sleep(Duration::from_secs(1)).await;
        // The sender went away with the aborted task.
        assert!(rx.recv().await.is_none());
    }
}
