//! Shutdown coordination for the gateway.

use tokio::sync::watch;

/// Coordinator for graceful shutdown.
///
/// The stop state is level-triggered: a task that subscribes after
/// `trigger` still observes it. Probe loops check their receiver between
/// iterations; the HTTP server awaits it.
#[derive(Debug)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal. Only the first call has an effect.
    pub fn trigger(&self) {
        if self.tx.send_replace(true) {
            return;
        }
        tracing::info!(subscribers = self.tx.receiver_count(), "Shutdown triggered");
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
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

/// Resolve once `rx` reports shutdown or its coordinator is gone.
pub async fn stopped(mut rx: watch::Receiver<bool>) {
    let _ = rx.wait_for(|stop| *stop).await;
}

/// Non-blocking check: fired, or the coordinator was dropped.
pub fn stop_requested(rx: &watch::Receiver<bool>) -> bool {
    *rx.borrow() || rx.has_changed().is_err()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn subscribers_observe_trigger_once() {
        let shutdown = Shutdown::new();
        let a = shutdown.subscribe();
        let b = shutdown.subscribe();
        assert_eq!(shutdown.receiver_count(), 2);
        assert!(!stop_requested(&a));

        shutdown.trigger();
        shutdown.trigger();
        assert!(shutdown.is_triggered());

        assert!(stop_requested(&a));
        tokio::time::timeout(Duration::from_secs(1), stopped(b))
            .await
            .expect("receiver should resolve after trigger");
    }

    #[tokio::test]
    async fn late_subscriber_sees_earlier_trigger() {
        let shutdown = Shutdown::new();
        shutdown.trigger();

        let rx = shutdown.subscribe();
        assert!(stop_requested(&rx));
        tokio::time::timeout(Duration::from_secs(1), stopped(rx))
            .await
            .expect("late subscriber should not wait");
    }

    #[test]
    fn dropped_coordinator_counts_as_stop() {
        let orphan = {
            let s = Shutdown::new();
            s.subscribe()
        };
        assert!(stop_requested(&orphan));
    }
}
