//! Provider traits for display-context sampling.
//!
//! These traits abstract host-specific implementations,
//! allowing the domain logic to remain pure and testable.

use crate::state::EnvironmentSignals;

/// Source of raw environment observations.
pub trait ContextSource: Send + Sync {
    /// Take a synchronous, side-effect-free sample of the environment.
    fn sample(&self) -> EnvironmentSignals;
}

/// Null implementation for testing or hosts without any display APIs.
///
/// Every sample classifies as Browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSource;

impl ContextSource for NullSource {
    fn sample(&self) -> EnvironmentSignals {
        EnvironmentSignals::default()
    }
}
