//! Cancellable periodic tasks on the tokio runtime.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Handle to a periodic task. The task stops when the handle is cancelled
/// or dropped.
#[derive(Debug)]
pub struct TaskHandle {
    name: &'static str,
    join: JoinHandle<()>,
}

impl TaskHandle {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Stop the task. A tick in progress is abandoned at its next await.
    pub fn cancel(&self) {
        if !self.join.is_finished() {
            tracing::debug!("Cancelling periodic task '{}'", self.name);
        }
        self.join.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.join.abort();
    }
}

/// Run `action` first after `first_delay`, then every `period`.
///
/// Each run is awaited before the next tick is taken, so runs never
/// overlap. A run that overshoots its period delays the following ticks
/// instead of bursting to catch up.
pub fn schedule<F, Fut>(
    name: &'static str,
    first_delay: Duration,
    period: Duration,
    mut action: F,
) -> TaskHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let period = period.max(Duration::from_millis(1));
    let join = tokio::spawn(async move {
        let mut ticks = time::interval_at(Instant::now() + first_delay, period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticks.tick().await;
            action().await;
        }
    });

    tracing::debug!(
        "Armed periodic task '{}' (first after {:?}, every {:?})",
        name,
        first_delay,
        period
    );
    TaskHandle { name, join }
}
