use crate::{Result, StorageError, StorageSink};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-memory storage for headless hosts and tests.
///
/// `fail_writes(true)` makes every write fail with a quota error.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored value for `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.items.lock().ok()?.get(key).cloned()
    }

    /// Number of successful `set_item` calls.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Toggle quota failures for the writes that follow.
    pub fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl StorageSink for MemoryStorage {
    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::QuotaExceeded(key.to_string()));
        }
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Storage that rejects every write, as in a browser with storage disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledStorage;

impl StorageSink for DisabledStorage {
    fn set_item(&self, _key: &str, _value: &str) -> Result<()> {
        Err(StorageError::Disabled)
    }
}
