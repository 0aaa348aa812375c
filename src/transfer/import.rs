use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::form::snapshot::{FORM_ID_ATTR, Snapshot, TIMESTAMP_ATTR};
use crate::session::error::FormError;
use crate::store::identity::FormId;
use crate::store::kv::KeyValueStore;
use crate::store::layout::save_snapshot;

/// What to do with keys in an imported file that the schema does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownFieldPolicy {
    /// Keep them verbatim and re-export them on every later save
    #[default]
    Preserve,
    /// Drop them on import
    Strip,
}

/// Reject files that are not named like a JSON export.
pub fn check_file_name(file_name: &str) -> Result<(), FormError> {
    if file_name.to_ascii_lowercase().ends_with(".json") {
        Ok(())
    } else {
        Err(FormError::UnsupportedFile {
            file_name: file_name.to_string(),
        })
    }
}

/// Parse and validate an import payload without touching any state.
///
/// The payload must be a JSON object whose `formId` and `timestamp` are
/// present and non-empty. Bytes that are not UTF-8 JSON are a parse error.
pub fn parse_payload(payload: impl AsRef<[u8]>) -> Result<Map<String, Value>, FormError> {
    let value: Value = serde_json::from_slice(payload.as_ref()).map_err(FormError::ImportParse)?;
    let Value::Object(record) = value else {
        return Err(FormError::ImportSchema {
            missing: FORM_ID_ATTR,
        });
    };

    for attr in [FORM_ID_ATTR, TIMESTAMP_ATTR] {
        if !record.get(attr).is_some_and(is_present) {
            return Err(FormError::ImportSchema { missing: attr });
        }
    }
    Ok(record)
}

/// Anything but null, false, zero or an empty string.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Validate `payload` and store it as the snapshot of `current`.
///
/// The stored record always carries the importing session's identity and
/// the current time; it replaces any prior snapshot wholesale. On any error
/// nothing is written.
pub fn import_progress<S: KeyValueStore>(
    store: &mut S,
    current: &FormId,
    payload: impl AsRef<[u8]>,
    policy: UnknownFieldPolicy,
) -> Result<Snapshot, FormError> {
    let record = parse_payload(payload)?;
    let mut snapshot = Snapshot::from_record(current.clone(), Utc::now(), record);

    if policy == UnknownFieldPolicy::Strip && !snapshot.extra.is_empty() {
        tracing::info!(dropped = snapshot.extra.len(), "stripping unknown fields from import");
        snapshot.extra.clear();
    }

    save_snapshot(store, &snapshot)?;
    Ok(snapshot)
}
