//! Display-context awareness for uxmode.
//!
//! This crate classifies the page's presentation context and decides which
//! UX section to show. It tracks:
//! - Presentation context (browser tab, installed window, OS fullscreen)
//! - Session nature (did the session start as an installed app)
//! - Manual override (pinned selection)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Domain Layer                             │
//! │  detector.rs - Signals -> PresentationContext (pure)        │
//! │  mode.rs     - UxSelection and resolution logic (pure)      │
//! │  state.rs    - SessionState, EnvironmentSignals             │
//! │  provider.rs - Traits for environment sampling              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Infrastructure Layer                        │
//! │  platform/   - Snapshot-backed source for headless hosts    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use uxmode_context::{detect_from, resolve, MappingConfig, NullSource, SessionNature, UxSelection};
//!
//! let context = detect_from(&NullSource);
//! let selection = resolve(context, SessionNature::Browser, None, &MappingConfig::default());
//! assert_eq!(selection, UxSelection::Web);
//! ```

mod detector;
mod mode;
mod provider;
mod state;

pub mod platform;

pub use detector::{detect, detect_from, is_mobile_user_agent, looks_installed, MOBILE_UA_MARKERS};
pub use mode::{resolve, MappingConfig, UxSelection};
pub use provider::{ContextSource, NullSource};
pub use state::{
    Dimensions, DisplayModeMatches, EnvironmentSignals, PresentationContext, SessionNature,
    SessionState,
};
