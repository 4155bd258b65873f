//! Presentation context and session state structures.

use crate::mode::{resolve, MappingConfig, UxSelection};
use serde::{Deserialize, Serialize};

/// Presentation mode reported by the host at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PresentationContext {
    /// Regular browser tab.
    #[default]
    Browser,

    /// Installed app window.
    Standalone,

    /// OS-level fullscreen, entered from either of the above.
    Fullscreen,
}

impl PresentationContext {
    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PresentationContext::Browser => "browser",
            PresentationContext::Standalone => "standalone",
            PresentationContext::Fullscreen => "fullscreen",
        }
    }
}

impl std::fmt::Display for PresentationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Whether the session originated as an installed/standalone session.
///
/// Sticky across fullscreen excursions: only Standalone and Browser entries
/// change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionNature {
    #[default]
    Browser,
    Standalone,
}

impl SessionNature {
    /// True for sessions that started as an installed app.
    pub fn is_standalone(&self) -> bool {
        matches!(self, SessionNature::Standalone)
    }

    /// Nature implied by a freshly observed context. Fullscreen implies nothing.
    pub fn entered(context: PresentationContext) -> Option<SessionNature> {
        match context {
            PresentationContext::Standalone => Some(SessionNature::Standalone),
            PresentationContext::Browser => Some(SessionNature::Browser),
            PresentationContext::Fullscreen => None,
        }
    }
}

/// Width/height pair in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Create from a width and height.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Result of the three `(display-mode: ...)` media queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayModeMatches {
    pub standalone: bool,
    pub fullscreen: bool,
    pub browser: bool,
}

/// Raw observations sampled from the host environment.
///
/// `None` means the host does not expose the corresponding API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentSignals {
    /// An element currently holds OS-level fullscreen.
    pub fullscreen_element: bool,

    /// Display-mode media query results.
    pub display_mode: Option<DisplayModeMatches>,

    /// Platform "installed" flag (e.g. `navigator.standalone` on iOS).
    pub installed_flag: Option<bool>,

    pub user_agent: Option<String>,

    /// Document referrer; empty strings count as absent.
    pub referrer: Option<String>,

    pub viewport: Option<Dimensions>,

    pub screen: Option<Dimensions>,
}

/// Live session state owned by the transition engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SessionState {
    pub context: PresentationContext,

    pub nature: SessionNature,

    /// Manual override; never cleared once set.
    pub pinned: Option<UxSelection>,

    /// Currently displayed selection.
    pub selection: UxSelection,
}

impl SessionState {
    /// Fresh state for a boot-time detection.
    pub fn detected(
        context: PresentationContext,
        pinned: Option<UxSelection>,
        mapping: &MappingConfig,
    ) -> Self {
        let nature = SessionNature::entered(context).unwrap_or_default();
        Self {
            context,
            nature,
            pinned,
            selection: resolve(context, nature, pinned, mapping),
        }
    }

    /// Apply a newly observed context.
    ///
    /// Fullscreen entry/exit leaves `nature` untouched. The selection is only
    /// recomputed while no override is pinned.
    pub fn enter(&mut self, context: PresentationContext, mapping: &MappingConfig) {
        if let Some(nature) = SessionNature::entered(context) {
            self.nature = nature;
        }
        self.context = context;
        if self.pinned.is_none() {
            self.selection = resolve(context, self.nature, None, mapping);
        }
    }

    /// Disables automatic resolution for the rest of the session.
    pub fn pin(&mut self, selection: UxSelection) {
        self.pinned = Some(selection);
        self.selection = selection;
    }
}
