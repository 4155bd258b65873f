//! Mirror of transition records onto the host's own event system.
//!
//! A browser host turns each emit into a dispatched DOM event, a native
//! host into a webview or IPC message.

use crate::TransitionDetail;
use std::sync::{Arc, Mutex};

/// Sink for JSON-encoded transition records.
pub trait EventBus: Send + Sync {
    fn emit(&self, topic: &str, payload: serde_json::Value);
}

/// Shared event bus reference.
pub type EventBusRef = Arc<dyn EventBus>;

/// One recorded emit.
#[derive(Debug, Clone)]
pub struct EmittedEvent {
    pub topic: String,
    pub payload: serde_json::Value,
}

impl EmittedEvent {
    /// Decode the payload back into a record, if it is one.
    pub fn detail(&self) -> Option<TransitionDetail> {
        serde_json::from_value(self.payload.clone()).ok()
    }
}

/// Records every emit, for headless hosts and tests.
#[derive(Debug, Default)]
pub struct InMemoryEventBus {
    emitted: Mutex<Vec<EmittedEvent>>,
}

impl InMemoryEventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events emitted on `topic`, oldest first.
    pub fn events_for(&self, topic: &str) -> Vec<EmittedEvent> {
        match self.emitted.lock() {
            Ok(emitted) => emitted.iter().filter(|e| e.topic == topic).cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Number of events emitted on any topic.
    pub fn len(&self) -> usize {
        self.emitted.lock().map(|emitted| emitted.len()).unwrap_or(0)
    }

    /// Whether nothing was emitted yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventBus for InMemoryEventBus {
    fn emit(&self, topic: &str, payload: serde_json::Value) {
        if let Ok(mut emitted) = self.emitted.lock() {
            emitted.push(EmittedEvent {
                topic: topic.to_string(),
                payload,
            });
        }
    }
}

/// Drops everything. Default for hosts that only use in-process observers.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEventBus;

impl EventBus for NullEventBus {
    fn emit(&self, _topic: &str, _payload: serde_json::Value) {}
}
