//! Fire-and-forget timers that can still be cancelled.

use std::{future::Future, time::Duration};

use tokio::task::AbortHandle;
use tracing::Instrument;

/// A unit of work that runs once after a delay.
///
/// Dropping the handle does not cancel the work; call [`ScheduledTask::cancel`] for that.
#[derive(Debug)]
pub struct ScheduledTask {
    handle: AbortHandle,
}

impl ScheduledTask {
    /// Runs `task` on the runtime once `delay` has elapsed.
    pub fn after<F>(delay: Duration, task: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(
            async move {
                tokio::time::sleep(delay).await;
                task.await;
            }
            .in_current_span(),
        );

        Self { handle: handle.abort_handle() }
    }

    /// Stops the task if it has not run yet.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    };

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn runs_after_delay() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();

        let task = ScheduledTask::after(Duration::from_secs(5), async move {
            flag.store(true, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(!ran.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(ran.load(Ordering::SeqCst));
        assert!(task.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_run() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();

        let task = ScheduledTask::after(Duration::from_secs(5), async move {
            flag.store(true, Ordering::SeqCst);
        });
        task.cancel();

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_keeps_task_alive() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();

        drop(ScheduledTask::after(Duration::from_secs(1), async move {
            flag.store(true, Ordering::SeqCst);
        }));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(ran.load(Ordering::SeqCst));
    }
}
