//! Shutdown coordination for request listeners.

use tokio::sync::watch;

/// Coordinator for cooperative cancellation.
///
/// Owned by the embedding application. Listeners receive read-only
/// [`ShutdownSignal`] views via [`Shutdown::signal`]; only the owner can
/// trigger cancellation.
#[derive(Debug)]
pub struct Shutdown {
    /// Watch channel carrying the triggered flag.
    tx: watch::Sender<bool>,
}

impl Shutdown {
    /// Create a new coordinator in the not-triggered state.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Request cancellation. Idempotent; all signals observe the flag on
    /// their next read.
    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }

    /// Whether cancellation has been requested.
    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Create a read-only view for handing to a listener.
    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of a [`Shutdown`] coordinator.
///
/// Holders can ask whether cancellation was requested, or wait for it; they
/// cannot trigger or clear it.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Whether cancellation has been requested. Never suspends.
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait until cancellation is requested.
    ///
    /// Resolves immediately if the coordinator already triggered, including
    /// the case where it triggered and was then dropped.
    pub async fn triggered(&mut self) {
        let _ = self.rx.wait_for(|triggered| *triggered).await;
    }
}
