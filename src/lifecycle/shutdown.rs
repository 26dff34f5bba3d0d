//! Shutdown coordination for the servant.
//!
//! The HTTP server holds a receiver from [`Shutdown::subscribe`] and stops
//! accepting connections once it fires; in-flight dispatches still finish.

use std::future::Future;

use tokio::sync::broadcast;

#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver that resolves once shutdown is triggered.
    ///
    /// Subscribe before triggering; a late subscriber misses the signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Tell every subscriber to stop.
    pub fn trigger(&self) {
        if self.tx.send(()).is_err() {
            tracing::debug!("Shutdown triggered with no subscribers");
        }
    }

    /// Wait for `signal`, then trigger.
    pub async fn trigger_after<F>(self, signal: F)
    where
        F: Future<Output = ()>,
    {
        signal.await;
        tracing::info!("Stopping servant");
        self.trigger();
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
