//! Fire-and-forget usage telemetry sink.
//!
//! A `flume`-backed channel, drained by a background task, never blocking
//! the producer: telemetry writes are best-effort and lock-free from the
//! engine's point of view (enqueue-and-forget).

use std::sync::Arc;

use tracing::warn;

use crate::catalog::model::DefectUsageEvent;

/// Receives usage events. Implementations must never block or fail the
/// caller — `record` itself cannot return an error; a sink that wants to
/// report failures does so via its own logging.
pub trait UsageSink: Send + Sync {
    fn record(&self, event: DefectUsageEvent);
}

/// Sink that enqueues onto an unbounded channel and drops silently if the
/// receiver has gone away (the workflow must never block on telemetry).
pub struct ChannelUsageSink {
    sender: flume::Sender<DefectUsageEvent>,
}

impl ChannelUsageSink {
    /// Create a sink and its paired background-drainable receiver.
    #[must_use]
    pub fn unbounded() -> (Self, flume::Receiver<DefectUsageEvent>) {
        let (sender, receiver) = flume::unbounded();
        (Self { sender }, receiver)
    }

    /// Spawn a task that drains events with the given handler.
    pub fn spawn_drain<F>(receiver: flume::Receiver<DefectUsageEvent>, mut handler: F) -> tokio::task::JoinHandle<()>
    where
        F: FnMut(DefectUsageEvent) + Send + 'static,
    {
        tokio::spawn(async move {
            while let Ok(event) = receiver.recv_async().await {
                handler(event);
            }
        })
    }
}

impl UsageSink for ChannelUsageSink {
    fn record(&self, event: DefectUsageEvent) {
        if self.sender.send(event).is_err() {
            warn!("usage telemetry receiver dropped; event discarded");
        }
    }
}

/// Discards every event. Used by tests and hosts that don't care about
/// telemetry.
#[derive(Default)]
pub struct NullUsageSink;

impl UsageSink for NullUsageSink {
    fn record(&self, _event: DefectUsageEvent) {}
}

/// Convenience alias for the trait-object form the catalog store holds.
pub type SharedUsageSink = Arc<dyn UsageSink>;
