use chrono::{DateTime, SecondsFormat, Utc};

use crate::form::snapshot::Snapshot;
use crate::store::identity::FormId;
use crate::store::kv::{KeyValueStore, StorageError};

// ============================================================================
// Persistent key layout
// ============================================================================

/// Key holding the current identity string.
pub const CURRENT_FORM_ID_KEY: &str = "currentFormId";

/// Key holding the ISO-8601 time of the last successful export.
pub const LAST_EXPORT_TIME_KEY: &str = "lastExportTime";

const SNAPSHOT_KEY_PREFIX: &str = "formData_";

pub fn snapshot_key(id: &FormId) -> String {
    format!("{SNAPSHOT_KEY_PREFIX}{id}")
}

/// ISO-8601 UTC with millisecond precision, e.g. `2024-05-01T09:30:00.000Z`.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

// ============================================================================
// Snapshot records
// ============================================================================

/// Raw JSON of the snapshot saved under `id`, if any.
pub fn load_snapshot_json<S: KeyValueStore>(
    store: &S,
    id: &FormId,
) -> Result<Option<String>, StorageError> {
    store.get(&snapshot_key(id))
}

/// Decoded snapshot saved under `id`, if any.
pub fn load_snapshot<S: KeyValueStore>(
    store: &S,
    id: &FormId,
) -> Result<Option<Snapshot>, StorageError> {
    let key = snapshot_key(id);
    let Some(raw) = store.get(&key)? else {
        return Ok(None);
    };

    Snapshot::from_stored(&raw)
        .map(Some)
        .map_err(|reason| StorageError::Corrupt {
            key,
            reason: reason.to_string(),
        })
}

/// Overwrite the record for the snapshot's identity wholesale.
pub fn save_snapshot<S: KeyValueStore>(store: &mut S, snapshot: &Snapshot) -> Result<(), StorageError> {
    let key = snapshot_key(&snapshot.identity);
    let json = snapshot.to_json().map_err(|e| StorageError::Corrupt {
        key: key.clone(),
        reason: e.to_string(),
    })?;
    store.set(&key, &json)?;
    tracing::debug!(key = %key, bytes = json.len(), "snapshot saved");
    Ok(())
}

pub fn delete_snapshot<S: KeyValueStore>(store: &mut S, id: &FormId) -> Result<(), StorageError> {
    store.delete(&snapshot_key(id))
}

// ============================================================================
// Export bookkeeping
// ============================================================================

pub fn record_export_time<S: KeyValueStore>(
    store: &mut S,
    at: DateTime<Utc>,
) -> Result<(), StorageError> {
    store.set(LAST_EXPORT_TIME_KEY, &iso_timestamp(at))
}

/// Last successful export time. An unparseable value reads as absent.
pub fn last_export_time<S: KeyValueStore>(store: &S) -> Result<Option<DateTime<Utc>>, StorageError> {
    Ok(store
        .get(LAST_EXPORT_TIME_KEY)?
        .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
        .map(|t| t.with_timezone(&Utc)))
}

pub fn clear_export_time<S: KeyValueStore>(store: &mut S) -> Result<(), StorageError> {
    store.delete(LAST_EXPORT_TIME_KEY)
}
