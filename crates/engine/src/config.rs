//! Runtime configuration.
//!
//! Every field has a default; partial JSON documents merge over them.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uxmode_context::{MappingConfig, UxSelection};

/// Quiet period for coalescing display-mode signal bursts.
pub const DEFAULT_DEBOUNCE_MS: u64 = 150;

/// Configuration accepted at boot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Log transitions at info instead of debug.
    pub debug: bool,

    pub containers: ContainerConfig,

    pub mapping: MappingConfig,

    /// Optional per-selection paths used when navigating.
    pub routes: Routes,

    pub routing: RoutingConfig,

    /// Prefix for persisted keys.
    pub storage_namespace: String,

    pub debounce_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            debug: false,
            containers: ContainerConfig::default(),
            mapping: MappingConfig::default(),
            routes: Routes::default(),
            routing: RoutingConfig::default(),
            storage_namespace: "uxmode".to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

/// Selectors of the two UX containers and the class that hides them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    pub web: String,
    pub app: String,
    pub hidden_class: String,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            web: "#web-ux".to_string(),
            app: "#app-ux".to_string(),
            hidden_class: "hidden".to_string(),
        }
    }
}

impl ContainerConfig {
    /// Selector of the container for `selection`.
    pub fn selector(&self, selection: UxSelection) -> &str {
        match selection {
            UxSelection::Web => &self.web,
            UxSelection::App => &self.app,
        }
    }
}

/// Paths to navigate to per selection, relative to the current URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Routes {
    pub web: Option<String>,
    pub app: Option<String>,
}

impl Routes {
    /// Route configured for `selection`, if any.
    pub fn for_selection(&self, selection: UxSelection) -> Option<&str> {
        match selection {
            UxSelection::Web => self.web.as_deref(),
            UxSelection::App => self.app.as_deref(),
        }
    }
}

/// How a selection is encoded in the page URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoutingStrategy {
    /// `?{query_param}=web|app`
    Query,
    /// `#{hash_prefix}web|app`
    Hash,
    /// Not encoded; decided from the display context only.
    #[default]
    Runtime,
}

/// Strategy plus its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub strategy: RoutingStrategy,
    pub query_param: String,
    pub hash_prefix: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            strategy: RoutingStrategy::Runtime,
            query_param: "ux".to_string(),
            hash_prefix: "ux=".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Parse a (possibly partial) JSON document over the defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Deep-merge a JSON overlay over this config.
    ///
    /// Objects merge key by key; any other value replaces the current one.
    pub fn merged_with(&self, overlay: serde_json::Value) -> Result<Self> {
        let mut base = serde_json::to_value(self)?;
        merge_json(&mut base, overlay);
        Ok(serde_json::from_value(base)?)
    }

    /// Debounce quiet period as a `Duration`.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.containers.web.trim().is_empty() || self.containers.app.trim().is_empty() {
            return Err(EngineError::InvalidConfig(
                "container selectors must not be empty".to_string(),
            ));
        }
        if self.containers.web == self.containers.app {
            return Err(EngineError::InvalidConfig(format!(
                "web and app containers share selector {}",
                self.containers.web
            )));
        }
        if self.containers.hidden_class.trim().is_empty() {
            return Err(EngineError::InvalidConfig(
                "hidden class must not be empty".to_string(),
            ));
        }
        if self.storage_namespace.trim().is_empty() {
            return Err(EngineError::InvalidConfig(
                "storage namespace must not be empty".to_string(),
            ));
        }
        match self.routing.strategy {
            RoutingStrategy::Query if self.routing.query_param.trim().is_empty() => Err(
                EngineError::InvalidConfig("query strategy needs a query_param".to_string()),
            ),
            RoutingStrategy::Hash if self.routing.hash_prefix.is_empty() => Err(
                EngineError::InvalidConfig("hash strategy needs a hash_prefix".to_string()),
            ),
            _ => Ok(()),
        }
    }
}

fn merge_json(base: &mut serde_json::Value, overlay: serde_json::Value) {
    match (base, overlay) {
        (serde_json::Value::Object(base), serde_json::Value::Object(overlay)) => {
            for (key, value) in overlay {
                merge_json(base.entry(key).or_insert(serde_json::Value::Null), value);
            }
        }
        (base, overlay) => *base = overlay,
    }
}
