use sso_intake::store::file::FileStore;
use sso_intake::store::identity::{FORM_ID_PREFIX, IdentityManager};
use sso_intake::store::layout::{
    CURRENT_FORM_ID_KEY, LAST_EXPORT_TIME_KEY, iso_timestamp, last_export_time, load_snapshot,
    record_export_time, save_snapshot, snapshot_key,
};
use sso_intake::{Field, FieldValue, KeyValueStore, MemoryStore, Snapshot, StorageError};

use crate::common::utils::{at, form_id};

mod common;

// =========================================================================
// MemoryStore
// =========================================================================

#[test]
fn memory_store_get_set_delete() {
    let mut store = MemoryStore::new();
    assert_eq!(store.get("a").unwrap(), None);

    store.set("a", "1").unwrap();
    assert_eq!(store.get("a").unwrap(), Some("1".to_string()));

    store.set("a", "2").unwrap();
    assert_eq!(store.get("a").unwrap(), Some("2".to_string()), "set overwrites");

    store.delete("a").unwrap();
    assert_eq!(store.get("a").unwrap(), None);
}

#[test]
fn deleting_absent_key_is_a_noop() {
    let mut store = MemoryStore::new();
    store.delete("missing").unwrap();
    store.delete("missing").unwrap();
    assert!(store.is_empty());
}

#[test]
fn memory_store_quota_rejects_oversized_write() {
    let mut store = MemoryStore::with_quota(16);
    store.set("k", "12345").unwrap();

    let err = store.set("other", "0123456789abcdef").unwrap_err();
    assert!(matches!(err, StorageError::QuotaExceeded { .. }));
    assert_eq!(store.get("other").unwrap(), None, "failed write leaves no trace");
    assert_eq!(store.get("k").unwrap(), Some("12345".to_string()));
}

#[test]
fn memory_store_quota_counts_replacement_not_sum() {
    let mut store = MemoryStore::with_quota(10);
    store.set("k", "123456").unwrap();
    // Replacing the same key frees the old value first
    store.set("k", "654321").unwrap();
    assert_eq!(store.len(), 1);
}

// =========================================================================
// FileStore
// =========================================================================

#[test]
fn file_store_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut store = FileStore::open(dir.path()).unwrap();
        store.set("formData_sso-1", "{\"a\":1}").unwrap();
    }
    let store = FileStore::open(dir.path()).unwrap();
    assert_eq!(store.get("formData_sso-1").unwrap(), Some("{\"a\":1}".to_string()));
}

#[test]
fn file_store_missing_key_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::open(dir.path().join("nested")).unwrap();

    assert_eq!(store.get("nothing").unwrap(), None);
    store.delete("nothing").unwrap();

    store.set("currentFormId", "sso-42").unwrap();
    store.delete("currentFormId").unwrap();
    assert_eq!(store.get("currentFormId").unwrap(), None);
}

#[test]
fn file_store_leaves_no_temp_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::open(dir.path()).unwrap();
    store.set("lastExportTime", "2024-05-01T09:30:00.000Z").unwrap();

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["lastExportTime".to_string()]);
}

// =========================================================================
// IdentityManager
// =========================================================================

#[test]
fn identity_is_created_lazily_and_persisted() {
    let mut store = MemoryStore::new();
    let mut identity = IdentityManager::new();
    assert!(store.is_empty());

    let id = identity.get_identity(&mut store).unwrap();
    assert!(id.as_str().starts_with(FORM_ID_PREFIX));
    assert_eq!(store.get(CURRENT_FORM_ID_KEY).unwrap(), Some(id.0.clone()));
}

#[test]
fn identity_is_stable_across_managers() {
    let mut store = MemoryStore::new();
    let first = IdentityManager::new().get_identity(&mut store).unwrap();
    let second = IdentityManager::new().get_identity(&mut store).unwrap();
    assert_eq!(first, second, "a reload sees the same identity");
}

#[test]
fn identity_after_clear_is_fresh_and_distinct() {
    let mut store = MemoryStore::new();
    let mut identity = IdentityManager::new();

    let old = identity.get_identity(&mut store).unwrap();
    identity.clear(&mut store).unwrap();
    assert_eq!(store.get(CURRENT_FORM_ID_KEY).unwrap(), None);

    let fresh = identity.get_identity(&mut store).unwrap();
    assert_ne!(old, fresh);
}

#[test]
fn identity_clear_is_distinct_even_for_loaded_identity() {
    let mut store = MemoryStore::new();
    let far_future = format!("{FORM_ID_PREFIX}99999999999999");
    store.set(CURRENT_FORM_ID_KEY, &far_future).unwrap();

    let mut identity = IdentityManager::new();
    identity.clear(&mut store).unwrap();
    let fresh = identity.get_identity(&mut store).unwrap();
    assert_ne!(fresh.0, far_future);
}

// =========================================================================
// Key layout
// =========================================================================

#[test]
fn snapshot_key_uses_identity() {
    assert_eq!(snapshot_key(&form_id("sso-123")), "formData_sso-123");
}

#[test]
fn snapshot_save_and_load() {
    let mut store = MemoryStore::new();
    let mut snapshot = Snapshot::new(form_id("sso-7"), at(9, 30, 0));
    snapshot.set(Field::AppName, FieldValue::Text("Acme".into()));

    save_snapshot(&mut store, &snapshot).unwrap();
    let loaded = load_snapshot(&store, &form_id("sso-7")).unwrap().unwrap();
    assert_eq!(loaded, snapshot);
    assert_eq!(load_snapshot(&store, &form_id("sso-8")).unwrap(), None);
}

#[test]
fn corrupt_snapshot_is_a_storage_error() {
    let mut store = MemoryStore::new();
    store.set("formData_sso-1", "{broken").unwrap();
    let err = load_snapshot(&store, &form_id("sso-1")).unwrap_err();
    assert!(matches!(err, StorageError::Corrupt { .. }));
}

#[test]
fn export_time_round_trip() {
    let mut store = MemoryStore::new();
    assert_eq!(last_export_time(&store).unwrap(), None);

    record_export_time(&mut store, at(10, 0, 0)).unwrap();
    assert_eq!(
        store.get(LAST_EXPORT_TIME_KEY).unwrap(),
        Some("2024-05-01T10:00:00.000Z".to_string())
    );
    assert_eq!(last_export_time(&store).unwrap(), Some(at(10, 0, 0)));
}

#[test]
fn iso_timestamp_has_millisecond_precision() {
    assert_eq!(iso_timestamp(at(9, 5, 7)), "2024-05-01T09:05:07.000Z");
}
