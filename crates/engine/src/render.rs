//! Container visibility toggling.
//!
//! Shows the container for the selected UX and hides the other one. If the
//! wanted container is missing the other one is shown instead, so a page
//! with at least one container never ends up with everything hidden.

use crate::config::ContainerConfig;
use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;
use uxmode_context::UxSelection;

/// The document holding the two UX containers.
pub trait ContainerHost: Send + Sync {
    fn exists(&self, selector: &str) -> bool;

    /// Add (`hidden = true`) or remove the hidden class on a container.
    fn set_hidden(&self, selector: &str, hidden_class: &str, hidden: bool);
}

/// What a render call ended up showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The requested container is visible.
    Shown(UxSelection),
    /// The requested container is missing; this one is visible instead.
    FellBack(UxSelection),
    /// Neither container exists.
    NoContainers,
}

/// Toggles the configured containers.
#[derive(Debug, Clone)]
pub struct Renderer {
    containers: ContainerConfig,
}

impl Renderer {
    /// Renderer over the given container selectors.
    pub fn new(containers: ContainerConfig) -> Self {
        Self { containers }
    }

    /// Idempotent: rendering the same selection twice leaves the same state.
    pub fn render(&self, host: &dyn ContainerHost, selection: UxSelection) -> RenderOutcome {
        let wanted = self.containers.selector(selection);
        let other = self.containers.selector(selection.other());
        let hidden_class = self.containers.hidden_class.as_str();

        match (host.exists(wanted), host.exists(other)) {
            (true, other_exists) => {
                host.set_hidden(wanted, hidden_class, false);
                if other_exists {
                    host.set_hidden(other, hidden_class, true);
                }
                RenderOutcome::Shown(selection)
            }
            (false, true) => {
                tracing::debug!(missing = wanted, fallback = other, "container missing; showing the other one");
                host.set_hidden(other, hidden_class, false);
                RenderOutcome::FellBack(selection.other())
            }
            (false, false) => RenderOutcome::NoContainers,
        }
    }
}

/// In-memory document for headless hosts and tests.
///
/// Tracks the class list of each registered container.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    containers: Mutex<HashMap<String, BTreeSet<String>>>,
    toggles: Mutex<Vec<(String, bool)>>,
}

impl MemoryDocument {
    /// Empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Document containing the given container selectors, all visible.
    pub fn with_containers(selectors: &[&str]) -> Self {
        let document = Self::default();
        for selector in selectors {
            document.insert(selector);
        }
        document
    }

    /// Add a visible container.
    pub fn insert(&self, selector: &str) {
        if let Ok(mut containers) = self.containers.lock() {
            containers.entry(selector.to_string()).or_default();
        }
    }

    /// Remove a container.
    pub fn remove(&self, selector: &str) {
        if let Ok(mut containers) = self.containers.lock() {
            containers.remove(selector);
        }
    }

    /// `None` when the container does not exist.
    pub fn has_class(&self, selector: &str, class: &str) -> Option<bool> {
        let containers = self.containers.lock().ok()?;
        containers.get(selector).map(|classes| classes.contains(class))
    }

    /// Every `set_hidden` call seen so far, in order.
    pub fn toggles(&self) -> Vec<(String, bool)> {
        self.toggles
            .lock()
            .map(|toggles| toggles.clone())
            .unwrap_or_default()
    }
}

impl ContainerHost for MemoryDocument {
    fn exists(&self, selector: &str) -> bool {
        self.containers
            .lock()
            .map(|containers| containers.contains_key(selector))
            .unwrap_or(false)
    }

    fn set_hidden(&self, selector: &str, hidden_class: &str, hidden: bool) {
        if let Ok(mut containers) = self.containers.lock() {
            if let Some(classes) = containers.get_mut(selector) {
                if hidden {
                    classes.insert(hidden_class.to_string());
                } else {
                    classes.remove(hidden_class);
                }
            }
        }
        if let Ok(mut toggles) = self.toggles.lock() {
            toggles.push((selector.to_string(), hidden));
        }
    }
}
