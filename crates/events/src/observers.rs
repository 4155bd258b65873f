//! In-process observer registry.
//!
//! Observers are invoked synchronously in registration order. A failing
//! observer (returned error or panic) is logged and skipped; delivery always
//! continues to the remaining observers.

use crate::TransitionDetail;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Error an observer may return to report a failed delivery.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("observer failed: {0}")]
pub struct ObserverError(pub String);

impl From<&str> for ObserverError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

impl From<String> for ObserverError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

/// Callback type for transition notifications.
pub type Observer = Box<dyn Fn(&TransitionDetail) -> Result<(), ObserverError> + Send + 'static>;

/// Handle returned by [`NotificationBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Outcome of one delivery round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Ordered set of observer callbacks.
#[derive(Default)]
pub struct NotificationBus {
    observers: Vec<(SubscriptionId, Observer)>,
    next_id: u64,
}

impl std::fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationBus")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl NotificationBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback. It runs after every observer already registered.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: Fn(&TransitionDetail) -> Result<(), ObserverError> + Send + 'static,
    {
        self.subscribe_boxed(Box::new(observer))
    }

    /// Register an already boxed callback.
    pub fn subscribe_boxed(&mut self, observer: Observer) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Returns false if the id was not (or no longer) subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Whether no observer is registered.
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Deliver `detail` to every observer.
    pub fn deliver(&self, detail: &TransitionDetail) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        for (id, observer) in &self.observers {
            match catch_unwind(AssertUnwindSafe(|| observer(detail))) {
                Ok(Ok(())) => report.delivered += 1,
                Ok(Err(err)) => {
                    report.failed += 1;
                    tracing::warn!(subscription = ?id, error = %err, "observer failed; continuing delivery");
                }
                Err(_) => {
                    report.failed += 1;
                    tracing::warn!(subscription = ?id, "observer panicked; continuing delivery");
                }
            }
        }

        report
    }
}
