//! Integration tests for the storage crate.
//!
//! Uses in-memory SQLite for fast, isolated tests.

use std::sync::Arc;
use uxmode_context::{PresentationContext, SessionNature, UxSelection};
use uxmode_storage::{PersistedSnapshot, PersistenceSink, SqliteStorage, StorageSink};

fn snapshot(selection: UxSelection) -> PersistedSnapshot {
    PersistedSnapshot {
        context: PresentationContext::Standalone,
        selection,
        nature: SessionNature::Standalone,
    }
}

// =============================================================================
// Database Initialization Tests
// =============================================================================

mod initialization {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_in_memory() {
        let storage = SqliteStorage::open_in_memory();
        assert!(storage.is_ok(), "Should create in-memory database");
    }

    #[test]
    fn test_open_file_database() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("uxmode.db");

        let storage = SqliteStorage::open(&db_path);
        assert!(storage.is_ok(), "Should create file-based database");
        assert!(db_path.exists(), "Database file should exist");
    }

    #[test]
    fn test_reopen_keeps_values() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("uxmode.db");

        {
            let storage = SqliteStorage::open(&db_path).unwrap();
            storage.set_item("ns:selection", "app").unwrap();
        }

        let storage = SqliteStorage::open(&db_path).unwrap();
        assert_eq!(storage.get("ns:selection").unwrap().as_deref(), Some("app"));
    }
}

// =============================================================================
// Snapshot Persistence Tests
// =============================================================================

mod persistence {
    use super::*;

    #[test]
    fn test_snapshot_round_trip_through_sqlite() {
        let storage = Arc::new(SqliteStorage::open_in_memory().unwrap());
        let sink = PersistenceSink::new(storage.clone(), "uxmode");

        assert!(sink.persist(&snapshot(UxSelection::App)));

        assert_eq!(storage.get("uxmode:context").unwrap().as_deref(), Some("standalone"));
        assert_eq!(storage.get("uxmode:selection").unwrap().as_deref(), Some("app"));
        assert_eq!(storage.get("uxmode:standalone").unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn test_later_snapshot_overwrites() {
        let storage = Arc::new(SqliteStorage::open_in_memory().unwrap());
        let sink = PersistenceSink::new(storage.clone(), "uxmode");

        sink.persist(&snapshot(UxSelection::App));
        sink.persist(&snapshot(UxSelection::Web));

        assert_eq!(storage.get("uxmode:selection").unwrap().as_deref(), Some("web"));
    }

    #[test]
    fn test_missing_key() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        assert_eq!(storage.get("uxmode:selection").unwrap(), None);
    }

    #[test]
    fn test_namespaces_are_isolated() {
        let storage = Arc::new(SqliteStorage::open_in_memory().unwrap());
        let first = PersistenceSink::new(storage.clone(), "first");
        let second = PersistenceSink::new(storage.clone(), "second");

        first.persist(&snapshot(UxSelection::App));
        second.persist(&snapshot(UxSelection::Web));

        assert_eq!(storage.get("first:selection").unwrap().as_deref(), Some("app"));
        assert_eq!(storage.get("second:selection").unwrap().as_deref(), Some("web"));
    }
}
