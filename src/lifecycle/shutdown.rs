//! Shutdown coordination for the service.

use std::future::Future;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Coordinator for graceful shutdown.
///
/// Provides a broadcast channel that all long-running tasks can subscribe to.
pub struct Shutdown {
    /// Broadcast channel sender.
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Get the number of active subscribers (tasks still running).
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve once a shutdown is triggered (or the sender is gone).
pub fn wait_for(mut rx: broadcast::Receiver<()>) -> impl Future<Output = ()> + Send + 'static {
    async move {
        let _ = rx.recv().await;
    }
}

/// How a drained task finished.
#[derive(Debug, PartialEq, Eq)]
pub enum DrainOutcome<T> {
    /// The task finished inside the grace period.
    Completed(T),
    /// The task panicked or was cancelled.
    Failed(String),
    /// The grace period elapsed and the task was aborted.
    Forced,
}

/// Wait up to `grace` for `task` to finish, aborting it afterwards.
pub async fn drain<T>(mut task: JoinHandle<T>, grace: Duration) -> DrainOutcome<T> {
    match tokio::time::timeout(grace, &mut task).await {
        Ok(Ok(value)) => DrainOutcome::Completed(value),
        Ok(Err(e)) => DrainOutcome::Failed(e.to_string()),
        Err(_) => {
            task.abort();
            DrainOutcome::Forced
        }
    }
}
