//! Shared event contracts for transition notifications.
//!
//! This crate defines the record delivered to observers on every relevant
//! transition, the in-process [`NotificationBus`] that delivers it, and the
//! `EventBus` trait used to mirror it onto the host's event system.

mod bus;
mod observers;

pub use bus::{EmittedEvent, EventBus, EventBusRef, InMemoryEventBus, NullEventBus};
pub use observers::{DeliveryReport, NotificationBus, Observer, ObserverError, SubscriptionId};

use serde::{Deserialize, Serialize};
use uxmode_context::{PresentationContext, UxSelection};

/// Why a transition record was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionCause {
    InitialDetection,
    ContextChange,
    ManualSwitch,
}

impl TransitionCause {
    /// Kebab-case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionCause::InitialDetection => "initial-detection",
            TransitionCause::ContextChange => "context-change",
            TransitionCause::ManualSwitch => "manual-switch",
        }
    }
}

impl std::fmt::Display for TransitionCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Event emitted on boot, on every context change and on manual switches.
///
/// Producers: transition engine
/// Consumers: observers, host event bus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionDetail {
    /// Presentation context after the transition.
    pub context: PresentationContext,
    /// Selection after the transition.
    pub selection: UxSelection,
    /// Whether `selection` differs from the value before the transition.
    pub did_change: bool,
    pub cause: TransitionCause,
    /// Timestamp in milliseconds.
    #[serde(default)]
    pub timestamp_ms: i64,
}

impl TransitionDetail {
    /// Record stamped with the current time.
    pub fn new(
        context: PresentationContext,
        selection: UxSelection,
        did_change: bool,
        cause: TransitionCause,
    ) -> Self {
        Self {
            context,
            selection,
            did_change,
            cause,
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Event names as constants to prevent typos.
pub mod event_names {
    /// UX mode transition event.
    pub const MODE_CHANGE: &str = "ux:mode-change";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_detail_wire_format() {
        let detail = TransitionDetail::new(
            PresentationContext::Standalone,
            UxSelection::App,
            true,
            TransitionCause::ContextChange,
        );
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["context"], "standalone");
        assert_eq!(json["selection"], "app");
        assert_eq!(json["cause"], "context-change");
        assert_eq!(json["did_change"], true);
    }

    #[test]
    fn test_transition_detail_deserialize_minimal() {
        let json = r#"{"context":"fullscreen","selection":"web","did_change":false,"cause":"manual-switch"}"#;
        let detail: TransitionDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.context, PresentationContext::Fullscreen);
        assert_eq!(detail.cause, TransitionCause::ManualSwitch);
        assert_eq!(detail.timestamp_ms, 0);
    }
}
