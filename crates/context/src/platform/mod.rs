//! Host adapters.
//!
//! Browser-backed sources live in the embedding host. This module provides
//! the snapshot source used by headless hosts and tests, where the host
//! pushes observations in as they change.

use crate::provider::ContextSource;
use crate::state::{Dimensions, DisplayModeMatches, EnvironmentSignals};
use std::sync::{PoisonError, RwLock};

/// Source backed by a mutable snapshot of environment signals.
#[derive(Debug, Default)]
pub struct SnapshotSource {
    signals: RwLock<EnvironmentSignals>,
}

impl SnapshotSource {
    /// Source starting from `signals`.
    pub fn new(signals: EnvironmentSignals) -> Self {
        Self {
            signals: RwLock::new(signals),
        }
    }

    /// Replace the whole snapshot.
    pub fn set(&self, signals: EnvironmentSignals) {
        self.update(|current| *current = signals);
    }

    /// Mutate the snapshot in place.
    ///
    /// A poisoned lock is recovered; the latest observation always lands.
    pub fn update(&self, f: impl FnOnce(&mut EnvironmentSignals)) {
        let mut guard = self.signals.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);
    }

    /// Record fullscreen entry or exit.
    pub fn set_fullscreen_element(&self, active: bool) {
        self.update(|s| s.fullscreen_element = active);
    }

    /// Record new display-mode query results.
    pub fn set_display_mode(&self, matches: DisplayModeMatches) {
        self.update(|s| s.display_mode = Some(matches));
    }

    /// Record a resized viewport.
    pub fn set_viewport(&self, viewport: Dimensions) {
        self.update(|s| s.viewport = Some(viewport));
    }
}

impl ContextSource for SnapshotSource {
    fn sample(&self) -> EnvironmentSignals {
        self.signals
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Display-mode matches for a plain browser tab.
pub fn browser_tab() -> DisplayModeMatches {
    DisplayModeMatches {
        browser: true,
        ..Default::default()
    }
}

/// Display-mode matches for an installed app window.
pub fn standalone_window() -> DisplayModeMatches {
    DisplayModeMatches {
        standalone: true,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::detect_from;
    use crate::state::PresentationContext;

    #[test]
    fn test_snapshot_source_reflects_updates() {
        let source = SnapshotSource::new(EnvironmentSignals {
            display_mode: Some(browser_tab()),
            ..Default::default()
        });
        assert_eq!(detect_from(&source), PresentationContext::Browser);

        source.set_display_mode(standalone_window());
        assert_eq!(detect_from(&source), PresentationContext::Standalone);

        source.set_fullscreen_element(true);
        assert_eq!(detect_from(&source), PresentationContext::Fullscreen);
    }

    #[test]
    fn test_updates_survive_poisoned_lock() {
        let source = std::sync::Arc::new(SnapshotSource::new(EnvironmentSignals {
            display_mode: Some(browser_tab()),
            ..Default::default()
        }));

        let poisoner = std::sync::Arc::clone(&source);
        let result = std::thread::spawn(move || {
            poisoner.update(|_| panic!("host adapter bug"));
        })
        .join();
        assert!(result.is_err());
        assert!(source.signals.is_poisoned());

        source.set_display_mode(standalone_window());
        assert_eq!(detect_from(source.as_ref()), PresentationContext::Standalone);

        source.set(EnvironmentSignals::default());
        assert_eq!(detect_from(source.as_ref()), PresentationContext::Browser);
    }
}
