//! Lightweight structured-event bus for node diagnostics.
//!
//! A `flume`-backed fan-out so nodes can report progress (attempt counters,
//! regeneration triggers, suspension) without coupling to a specific
//! logging backend. Scaled to this crate's single-active-node-at-a-time
//! graph — no subscriber registry or backpressure policy beyond what an
//! unbounded channel already gives.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// One structured event emitted by a workflow node.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowEvent {
    pub session_id: String,
    pub step: crate::types::WorkflowStep,
    pub scope: String,
    pub message: String,
}

/// Sink-agnostic emitter: one method, so any channel or logger can back it.
pub trait EventEmitter: Send + Sync {
    fn emit(&self, event: WorkflowEvent);
}

/// Broadcasts onto an unbounded `flume` channel. Cloning is cheap — the
/// sender is reference-counted internally by `flume`.
#[derive(Clone)]
pub struct EventBus {
    sender: flume::Sender<WorkflowEvent>,
}

impl EventBus {
    /// Create a bus and its paired receiver for a consumer (tests, a
    /// logging sink, a host's SSE/websocket bridge) to drain.
    #[must_use]
    pub fn new() -> (Self, flume::Receiver<WorkflowEvent>) {
        let (sender, receiver) = flume::unbounded();
        (Self { sender }, receiver)
    }

    /// A bus with no live receiver — every emit is dropped silently. Used
    /// when a caller doesn't care about diagnostics.
    #[must_use]
    pub fn disconnected() -> Self {
        let (bus, _receiver) = Self::new();
        bus
    }

    #[must_use]
    pub fn as_emitter(&self) -> Arc<dyn EventEmitter> {
        Arc::new(self.clone())
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::disconnected()
    }
}

impl EventEmitter for EventBus {
    fn emit(&self, event: WorkflowEvent) {
        // Best-effort: a workflow step must never block or fail because no
        // one is listening for its diagnostics.
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WorkflowStep;

    #[test]
    fn emitted_events_are_received_in_order() {
        let (bus, receiver) = EventBus::new();
        bus.emit(WorkflowEvent {
            session_id: "s1".into(),
            step: WorkflowStep::Generate,
            scope: "generate".into(),
            message: "starting".into(),
        });
        bus.emit(WorkflowEvent {
            session_id: "s1".into(),
            step: WorkflowStep::Evaluate,
            scope: "evaluate".into(),
            message: "attempt 1".into(),
        });
        let first = receiver.try_recv().unwrap();
        let second = receiver.try_recv().unwrap();
        assert_eq!(first.scope, "generate");
        assert_eq!(second.scope, "evaluate");
    }

    #[test]
    fn disconnected_bus_drops_events_without_panicking() {
        let bus = EventBus::disconnected();
        bus.emit(WorkflowEvent {
            session_id: "s1".into(),
            step: WorkflowStep::Complete,
            scope: "x".into(),
            message: "y".into(),
        });
    }
}
