//! Stop signal shared by the HTTP server and the whois cache sweeper.

use tokio::sync::broadcast;

/// One-shot stop signal fanned out to the server's graceful drain and the
/// sweeper loop.
///
/// Clones share the same channel, so the signal forwarder can own one while
/// startup keeps another to stop the sweeper after the server returns.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// A receiver for one task; call before the task starts waiting.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Fire the signal. Firing twice, or with nobody listening, is harmless.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Receivers not yet dropped.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
