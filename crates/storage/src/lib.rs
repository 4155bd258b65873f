//! Write-only persistence of the live session state.
//!
//! The engine writes a namespaced snapshot after every transition so external
//! diagnostics can see it. Nothing here is ever read back into the decision
//! path, and write failures are never propagated past [`PersistenceSink`].

mod memory;
mod sqlite;

pub use memory::{DisabledStorage, MemoryStorage};
pub use sqlite::SqliteStorage;

use std::sync::Arc;
use uxmode_context::{PresentationContext, SessionNature, SessionState, UxSelection};

/// Errors from a storage write.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
    #[error("storage disabled")]
    Disabled,
    #[error("quota exceeded writing {0}")]
    QuotaExceeded(String),
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Result alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Key/value store the snapshot is written into.
pub trait StorageSink: Send + Sync {
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
}

/// Key suffixes under the configured namespace.
pub mod keys {
    /// Last detected presentation context.
    pub const CONTEXT: &str = "context";
    /// Displayed UX selection.
    pub const SELECTION: &str = "selection";
    /// `true` for installed-app sessions.
    pub const STANDALONE: &str = "standalone";
}

/// The persisted view of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistedSnapshot {
    pub context: PresentationContext,
    pub selection: UxSelection,
    pub nature: SessionNature,
}

impl From<&SessionState> for PersistedSnapshot {
    fn from(state: &SessionState) -> Self {
        Self {
            context: state.context,
            selection: state.selection,
            nature: state.nature,
        }
    }
}

/// Namespaced writer over a [`StorageSink`].
#[derive(Clone)]
pub struct PersistenceSink {
    storage: Arc<dyn StorageSink>,
    namespace: String,
}

impl std::fmt::Debug for PersistenceSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceSink")
            .field("namespace", &self.namespace)
            .finish()
    }
}

impl PersistenceSink {
    /// Writer prefixing every key with `namespace`.
    pub fn new(storage: Arc<dyn StorageSink>, namespace: impl Into<String>) -> Self {
        Self {
            storage,
            namespace: namespace.into(),
        }
    }

    /// Key prefix.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Fully qualified key, e.g. `uxmode:selection`.
    pub fn key(&self, suffix: &str) -> String {
        format!("{}:{}", self.namespace, suffix)
    }

    /// Write every key, stopping at the first failure.
    pub fn write(&self, snapshot: &PersistedSnapshot) -> Result<()> {
        self.storage
            .set_item(&self.key(keys::CONTEXT), snapshot.context.as_str())?;
        self.storage
            .set_item(&self.key(keys::SELECTION), snapshot.selection.as_str())?;
        let standalone = if snapshot.nature.is_standalone() { "true" } else { "false" };
        self.storage.set_item(&self.key(keys::STANDALONE), standalone)?;
        Ok(())
    }

    /// Write the snapshot, discarding any failure.
    ///
    /// Quota and disabled-storage errors are logged and dropped. There is no
    /// retry. Returns whether the write went through.
    pub fn persist(&self, snapshot: &PersistedSnapshot) -> bool {
        match self.write(snapshot) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(namespace = %self.namespace, error = %err, "state not persisted");
                false
            }
        }
    }
}
