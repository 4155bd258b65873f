//! The transition engine.
//!
//! Owns the session state and drives persist -> render -> notify on boot,
//! on every detected context change and on manual switches.
//!
//! Failure policy: nothing here returns an error once the engine is built.
//! Storage writes, fullscreen requests and observers are each allowed to
//! fail; the failure is logged at its call site and dropped, and the UX
//! decision stands.

use crate::config::RuntimeConfig;
use crate::error::Result;
use crate::platform::{
    FullscreenController, FullscreenRequest, Navigator, NullFullscreen, NullNavigator,
};
use crate::render::{ContainerHost, MemoryDocument, RenderOutcome, Renderer};
use crate::routing;
use crate::timer::PendingTimer;
use std::sync::Arc;
use std::time::Instant;
use uxmode_context::{
    detect_from, ContextSource, NullSource, PresentationContext, SessionNature, SessionState,
    UxSelection,
};
use uxmode_events::{
    event_names, EventBusRef, NotificationBus, NullEventBus, ObserverError, SubscriptionId,
    TransitionCause, TransitionDetail,
};
use uxmode_storage::{MemoryStorage, PersistedSnapshot, PersistenceSink, StorageSink};

/// Host capabilities the engine talks to.
#[derive(Clone)]
pub struct HostBindings {
    pub source: Arc<dyn ContextSource>,
    pub storage: Arc<dyn StorageSink>,
    pub document: Arc<dyn ContainerHost>,
    pub navigator: Arc<dyn Navigator>,
    pub fullscreen: Arc<dyn FullscreenController>,
    pub event_bus: EventBusRef,
}

impl Default for HostBindings {
    fn default() -> Self {
        Self::headless()
    }
}

impl HostBindings {
    /// Bindings with no display APIs, an empty document and in-memory storage.
    pub fn headless() -> Self {
        Self {
            source: Arc::new(NullSource),
            storage: Arc::new(MemoryStorage::new()),
            document: Arc::new(MemoryDocument::new()),
            navigator: Arc::new(NullNavigator),
            fullscreen: Arc::new(NullFullscreen),
            event_bus: Arc::new(NullEventBus),
        }
    }

    /// Replace the context source.
    pub fn with_source(mut self, source: Arc<dyn ContextSource>) -> Self {
        self.source = source;
        self
    }

    /// Replace the storage the snapshot is written to.
    pub fn with_storage(mut self, storage: Arc<dyn StorageSink>) -> Self {
        self.storage = storage;
        self
    }

    /// Replace the document holding the UX containers.
    pub fn with_document(mut self, document: Arc<dyn ContainerHost>) -> Self {
        self.document = document;
        self
    }

    /// Replace the location API.
    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    /// Replace the fullscreen API.
    pub fn with_fullscreen(mut self, fullscreen: Arc<dyn FullscreenController>) -> Self {
        self.fullscreen = fullscreen;
        self
    }

    /// Replace the bus transitions are mirrored onto.
    pub fn with_event_bus(mut self, event_bus: EventBusRef) -> Self {
        self.event_bus = event_bus;
        self
    }
}

/// Options for [`ModeEngine::switch_ux`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchOptions {
    pub persist: bool,
    pub navigate: bool,
    pub request_fullscreen: bool,
}

impl Default for SwitchOptions {
    fn default() -> Self {
        Self {
            persist: true,
            navigate: false,
            request_fullscreen: false,
        }
    }
}

impl SwitchOptions {
    /// Skip the storage write for this switch.
    pub fn without_persist(mut self) -> Self {
        self.persist = false;
        self
    }

    /// Navigate to the URL encoding the target.
    pub fn navigating(mut self) -> Self {
        self.navigate = true;
        self
    }

    /// Ask the host for OS fullscreen when switching to the app UX.
    pub fn with_fullscreen(mut self) -> Self {
        self.request_fullscreen = true;
        self
    }
}

/// Result of a manual switch.
#[derive(Debug)]
pub struct SwitchOutcome {
    pub detail: TransitionDetail,

    /// Location navigated to, if any.
    pub navigated_to: Option<String>,

    /// Issued fullscreen request. Dropping it does not cancel the request.
    pub fullscreen: Option<FullscreenRequest>,
}

/// Keeps the displayed UX in sync with the presentation context.
pub struct ModeEngine {
    config: RuntimeConfig,
    host: HostBindings,
    renderer: Renderer,
    persistence: PersistenceSink,
    observers: NotificationBus,
    state: SessionState,
    booted: bool,
    debounce: PendingTimer,
}

impl std::fmt::Debug for ModeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModeEngine")
            .field("state", &self.state)
            .field("booted", &self.booted)
            .field("observers", &self.observers.len())
            .field("debounce", &self.debounce)
            .finish()
    }
}

impl ModeEngine {
    /// Build an engine. Fails if `config` does not validate.
    pub fn new(config: RuntimeConfig, host: HostBindings) -> Result<Self> {
        config.validate()?;

        let renderer = Renderer::new(config.containers.clone());
        let persistence = PersistenceSink::new(Arc::clone(&host.storage), &config.storage_namespace);
        let debounce = PendingTimer::new(config.debounce());

        Ok(Self {
            config,
            host,
            renderer,
            persistence,
            observers: NotificationBus::new(),
            state: SessionState::default(),
            booted: false,
            debounce,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Whether initial detection has run.
    pub fn is_booted(&self) -> bool {
        self.booted
    }

    /// Last detected presentation context.
    pub fn context(&self) -> PresentationContext {
        self.state.context
    }

    /// Currently displayed UX.
    pub fn selection(&self) -> UxSelection {
        self.state.selection
    }

    /// Whether the session started as an installed app.
    pub fn session_nature(&self) -> SessionNature {
        self.state.nature
    }

    /// Manual override, if one was set.
    pub fn override_selection(&self) -> Option<UxSelection> {
        self.state.pinned
    }

    /// Copy of the full session state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Deadline of the pending debounced re-detection, if any.
    pub fn pending_deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    /// Register an observer for transition records.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: Fn(&TransitionDetail) -> std::result::Result<(), ObserverError> + Send + 'static,
    {
        self.observers.subscribe(observer)
    }

    /// Register an already boxed observer.
    pub fn subscribe_boxed(&mut self, observer: uxmode_events::Observer) -> SubscriptionId {
        self.observers.subscribe_boxed(observer)
    }

    /// Remove an observer. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Initial detection.
    ///
    /// A well-formed deep-link intent in the current location becomes the
    /// override; malformed or absent intents are ignored. An override set
    /// before boot (or by an earlier boot) is kept.
    pub fn boot(&mut self) -> TransitionDetail {
        let context = detect_from(self.host.source.as_ref());
        let intent = self
            .host
            .navigator
            .current_url()
            .and_then(|url| routing::read_intent(&url, &self.config.routing));
        let pinned = self.state.pinned.or(intent);

        self.state = SessionState::detected(context, pinned, &self.config.mapping);
        self.booted = true;

        tracing::debug!(
            context = %context,
            intent = ?intent,
            nature = ?self.state.nature,
            "initial detection"
        );

        self.commit(TransitionCause::InitialDetection, true, true)
    }

    /// Raw display-mode media query change. Re-detection is debounced.
    pub fn on_display_mode_signal(&mut self, now: Instant) {
        if !self.booted {
            return;
        }
        if self.debounce.arm(now) {
            tracing::trace!("display-mode signal coalesced");
        }
    }

    /// Run the debounced re-detection if its quiet period has elapsed.
    pub fn poll_timer(&mut self, now: Instant) -> Option<TransitionDetail> {
        if self.debounce.fire_if_due(now) {
            self.reevaluate()
        } else {
            None
        }
    }

    /// Fullscreen enter/exit. Handled immediately.
    pub fn on_fullscreen_signal(&mut self) -> Option<TransitionDetail> {
        self.reevaluate()
    }

    /// Re-detect and apply the context if it changed.
    ///
    /// Emits a context-change record whenever the context differs, even if
    /// the selection stays the same. Does nothing before [`boot`](Self::boot).
    pub fn reevaluate(&mut self) -> Option<TransitionDetail> {
        if !self.booted {
            return None;
        }

        let context = detect_from(self.host.source.as_ref());
        if context == self.state.context {
            tracing::trace!(context = %context, "context unchanged");
            return None;
        }

        let previous = self.state.selection;
        self.state.enter(context, &self.config.mapping);
        let did_change = self.state.selection != previous;

        Some(self.commit(TransitionCause::ContextChange, did_change, true))
    }

    /// Manually select a UX for the rest of the session.
    pub fn switch_ux(&mut self, target: UxSelection, options: SwitchOptions) -> SwitchOutcome {
        let previous = self.state.selection;
        self.state.pin(target);

        // The switch is rendered before fullscreen or navigation is attempted.
        let detail = self.commit(TransitionCause::ManualSwitch, target != previous, options.persist);

        let fullscreen = if options.request_fullscreen {
            self.request_fullscreen(target)
        } else {
            None
        };

        let navigated_to = if options.navigate {
            self.navigate_to(target)
        } else {
            None
        };

        SwitchOutcome {
            detail,
            navigated_to,
            fullscreen,
        }
    }

    fn request_fullscreen(&self, target: UxSelection) -> Option<FullscreenRequest> {
        if target != UxSelection::App {
            tracing::debug!(requested = %target, "fullscreen only requested for the app UX");
            return None;
        }
        Some(FullscreenRequest::new(self.host.fullscreen.request_fullscreen()))
    }

    /// Navigate to the URL encoding `target`, unless already there.
    fn navigate_to(&self, target: UxSelection) -> Option<String> {
        let current = self.host.navigator.current_url()?;
        let url = routing::target_url(&current, target, &self.config.routing, &self.config.routes)?;

        if routing::same_location(&current, &url) {
            tracing::debug!(url = %url, "already at target location");
            return None;
        }

        self.host.navigator.navigate(&url);
        Some(url)
    }

    /// persist -> render -> notify, in that order.
    fn commit(&mut self, cause: TransitionCause, did_change: bool, persist: bool) -> TransitionDetail {
        if persist {
            self.persistence.persist(&PersistedSnapshot::from(&self.state));
        }

        let outcome = self
            .renderer
            .render(self.host.document.as_ref(), self.state.selection);
        if outcome == RenderOutcome::NoContainers {
            tracing::trace!("no UX containers to render");
        }

        let detail = TransitionDetail::new(self.state.context, self.state.selection, did_change, cause);
        self.log_transition(&detail);
        self.notify(&detail);
        detail
    }

    fn notify(&self, detail: &TransitionDetail) {
        self.observers.deliver(detail);

        match serde_json::to_value(detail) {
            Ok(payload) => self.host.event_bus.emit(event_names::MODE_CHANGE, payload),
            Err(err) => tracing::warn!(error = %err, "failed to encode transition event"),
        }
    }

    fn log_transition(&self, detail: &TransitionDetail) {
        if self.config.debug {
            tracing::info!(
                cause = %detail.cause,
                context = %detail.context,
                selection = %detail.selection,
                did_change = detail.did_change,
                "ux transition"
            );
        } else {
            tracing::debug!(
                cause = %detail.cause,
                context = %detail.context,
                selection = %detail.selection,
                did_change = detail.did_change,
                "ux transition"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use uxmode_context::platform::{browser_tab, standalone_window, SnapshotSource};
    use uxmode_context::EnvironmentSignals;

    fn engine_at(signals: EnvironmentSignals) -> (ModeEngine, Arc<SnapshotSource>) {
        let source = Arc::new(SnapshotSource::new(signals));
        let host = HostBindings::headless().with_source(source.clone());
        (ModeEngine::new(RuntimeConfig::default(), host).unwrap(), source)
    }

    fn browser() -> EnvironmentSignals {
        EnvironmentSignals {
            display_mode: Some(browser_tab()),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = RuntimeConfig::default();
        config.storage_namespace.clear();
        assert!(ModeEngine::new(config, HostBindings::headless()).is_err());
    }

    #[test]
    fn test_signals_before_boot_are_ignored() {
        let (mut engine, source) = engine_at(browser());
        source.set_display_mode(standalone_window());

        engine.on_display_mode_signal(Instant::now());
        assert_eq!(engine.pending_deadline(), None);
        assert!(engine.on_fullscreen_signal().is_none());
        assert!(!engine.is_booted());
    }

    #[test]
    fn test_reevaluate_before_boot_is_ignored() {
        let (mut engine, source) = engine_at(browser());
        source.set_display_mode(standalone_window());

        assert!(engine.reevaluate().is_none());
        assert_eq!(engine.state(), SessionState::default());

        let detail = engine.boot();
        assert_eq!(detail.cause, TransitionCause::InitialDetection);
        assert_eq!(detail.selection, UxSelection::App);
    }

    #[test]
    fn test_debounce_coalesces_burst() {
        let (mut engine, source) = engine_at(browser());
        engine.boot();
        let start = Instant::now();

        source.set_display_mode(standalone_window());
        engine.on_display_mode_signal(start);
        engine.on_display_mode_signal(start + Duration::from_millis(100));

        assert!(engine.poll_timer(start + Duration::from_millis(200)).is_none());
        let detail = engine
            .poll_timer(start + Duration::from_millis(250))
            .expect("debounced transition");
        assert_eq!(detail.context, PresentationContext::Standalone);
        assert!(engine.poll_timer(start + Duration::from_millis(1000)).is_none());
    }

    #[test]
    fn test_switch_without_fullscreen_for_web() {
        let fullscreen = Arc::new(crate::platform::HeadlessFullscreen::granting());
        let host = HostBindings::headless().with_fullscreen(fullscreen.clone());
        let mut engine = ModeEngine::new(RuntimeConfig::default(), host).unwrap();
        engine.boot();

        let outcome = engine.switch_ux(UxSelection::Web, SwitchOptions::default().with_fullscreen());
        assert!(outcome.fullscreen.is_none());
        assert_eq!(fullscreen.requests(), 0);
    }

    /// Records whether the app container was visible when fullscreen was asked for.
    struct CheckingFullscreen {
        document: Arc<MemoryDocument>,
        app_visible: std::sync::Mutex<Vec<Option<bool>>>,
    }

    impl FullscreenController for CheckingFullscreen {
        fn request_fullscreen(&self) -> crate::platform::FullscreenFuture {
            let hidden = self.document.has_class("#app-ux", "hidden");
            if let Ok(mut seen) = self.app_visible.lock() {
                seen.push(hidden.map(|hidden| !hidden));
            }
            Box::pin(futures::future::ready(Ok(())))
        }
    }

    #[test]
    fn test_fullscreen_requested_after_render() {
        let document = Arc::new(MemoryDocument::with_containers(&["#web-ux", "#app-ux"]));
        let fullscreen = Arc::new(CheckingFullscreen {
            document: document.clone(),
            app_visible: std::sync::Mutex::new(Vec::new()),
        });
        let host = HostBindings::headless()
            .with_source(Arc::new(SnapshotSource::new(browser())))
            .with_document(document)
            .with_fullscreen(fullscreen.clone());
        let mut engine = ModeEngine::new(RuntimeConfig::default(), host).unwrap();
        engine.boot();

        let outcome = engine.switch_ux(UxSelection::App, SwitchOptions::default().with_fullscreen());

        assert!(outcome.fullscreen.is_some());
        assert_eq!(*fullscreen.app_visible.lock().unwrap(), vec![Some(true)]);
    }
}
