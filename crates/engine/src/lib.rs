//! Runtime that decides whether a page shows its web or app UX and keeps
//! that decision in sync as the presentation context changes.
//!
//! ```text
//! ContextSource ─▶ detect ─▶ resolve ─▶ ModeEngine ─┬▶ PersistenceSink
//!                                                   ├▶ Renderer
//!                                                   └▶ NotificationBus / EventBus
//! ```
//!
//! [`ModeEngine`] is synchronous and deterministic; [`EngineDriver`] runs it
//! on a tokio task and owns the debounce timing.

mod config;
mod driver;
mod engine;
mod error;
mod platform;
mod render;
mod routing;
mod timer;

pub use config::{
    ContainerConfig, Routes, RoutingConfig, RoutingStrategy, RuntimeConfig, DEFAULT_DEBOUNCE_MS,
};
pub use driver::{DriverHandle, EngineDriver, Signal};
pub use engine::{HostBindings, ModeEngine, SwitchOptions, SwitchOutcome};
pub use error::{EngineError, Result};
pub use platform::{
    FullscreenController, FullscreenError, FullscreenFuture, FullscreenRequest, HeadlessFullscreen,
    MemoryNavigator, Navigator, NullFullscreen, NullNavigator,
};
pub use render::{ContainerHost, MemoryDocument, RenderOutcome, Renderer};
pub use routing::{read_intent, same_location, target_url};
pub use timer::PendingTimer;

pub use uxmode_context::{PresentationContext, SessionNature, SessionState, UxSelection};
pub use uxmode_events::{ObserverError, SubscriptionId, TransitionCause, TransitionDetail};
