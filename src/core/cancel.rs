//! Cooperative cancellation shared by the caller, the executor and the steps

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Cloneable cancellation handle
///
/// Steps are expected to poll `is_cancelled` or race `cancelled()` against
/// their own work. Cancelling is idempotent.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl CancelSignal {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self { tx: Arc::new(tx), rx }
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the signal has been cancelled
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        // Sender gone: nothing can cancel any more
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }

    /// Cancel automatically once `deadline` has elapsed
    pub fn cancel_after(&self, deadline: Duration) -> tokio::task::JoinHandle<()> {
        let signal = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(deadline).await;
            tracing::debug!("Cancellation deadline of {:?} reached", deadline);
            signal.cancel();
        })
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}
