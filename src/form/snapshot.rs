use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::form::schema::{Field, FieldKind};
use crate::session::port::{Control, PresentationPort};
use crate::store::identity::FormId;
use crate::store::layout::iso_timestamp;

/// Top-level attribute carrying the identity.
pub const FORM_ID_ATTR: &str = "formId";

/// Top-level attribute carrying the save time.
pub const TIMESTAMP_ATTR: &str = "timestamp";

// ============================================================================
// Field values
// ============================================================================

/// A captured answer, typed by the kind of control it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Text input, textarea or select
    Text(String),
    /// Checkbox state
    Toggle(bool),
    /// Selected radio option, `None` when nothing in the group is checked
    Choice(Option<String>),
}

impl FieldValue {
    /// Decode a raw JSON value for a field of the given kind.
    ///
    /// Checkboxes count as checked only for a literal `true`. Scalars on
    /// text fields are stringified the way a form control would show them.
    pub fn coerce(kind: FieldKind, raw: &Value) -> FieldValue {
        match kind {
            FieldKind::Checkbox => FieldValue::Toggle(matches!(raw, Value::Bool(true))),
            FieldKind::Radio(_) => match raw {
                Value::Null => FieldValue::Choice(None),
                other => FieldValue::Choice(Some(scalar_text(other))),
            },
            FieldKind::Text | FieldKind::Select => match raw {
                Value::Null => FieldValue::Text(String::new()),
                other => FieldValue::Text(scalar_text(other)),
            },
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Toggle(b) => Value::Bool(*b),
            FieldValue::Choice(Some(s)) => Value::String(s.clone()),
            FieldValue::Choice(None) => Value::Null,
        }
    }

    /// Textual value, if the field holds one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Choice(choice) => choice.as_deref(),
            FieldValue::Toggle(_) => None,
        }
    }

    pub fn is_checked(&self) -> bool {
        matches!(self, FieldValue::Toggle(true))
    }

    /// Per-kind fill predicate: text non-blank, toggle on, choice made.
    pub fn is_filled(&self) -> bool {
        match self {
            FieldValue::Text(s) => !s.trim().is_empty(),
            FieldValue::Toggle(b) => *b,
            FieldValue::Choice(choice) => choice.is_some(),
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// Stored record could not be decoded.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("top level is not a JSON object")]
    NotAnObject,

    #[error("missing required attribute '{0}'")]
    MissingAttribute(&'static str),

    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),
}

/// All captured answers plus the identity and time they were saved under.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub identity: FormId,
    pub timestamp: DateTime<Utc>,

    /// Answers for fields the schema declares
    pub fields: BTreeMap<Field, FieldValue>,

    /// Keys the schema does not know, kept verbatim and never interpreted
    pub extra: Map<String, Value>,
}

impl Snapshot {
    pub fn new(identity: FormId, timestamp: DateTime<Utc>) -> Self {
        Self {
            identity,
            timestamp,
            fields: BTreeMap::new(),
            extra: Map::new(),
        }
    }

    /// Build a snapshot from a flat record. `formId`/`timestamp` in the
    /// record are ignored in favour of the given ones.
    pub fn from_record(identity: FormId, timestamp: DateTime<Utc>, record: Map<String, Value>) -> Self {
        let mut snapshot = Self::new(identity, timestamp);
        for (key, raw) in record {
            if key == FORM_ID_ATTR || key == TIMESTAMP_ATTR {
                continue;
            }
            match Field::from_key(&key) {
                Some(field) => {
                    snapshot.fields.insert(field, FieldValue::coerce(field.kind(), &raw));
                }
                None => {
                    snapshot.extra.insert(key, raw);
                }
            }
        }
        snapshot
    }

    /// Flat record: `timestamp`, `formId`, known fields in form order, then extras.
    pub fn to_record(&self) -> Map<String, Value> {
        let mut record = Map::new();
        record.insert(TIMESTAMP_ATTR.into(), Value::String(iso_timestamp(self.timestamp)));
        record.insert(FORM_ID_ATTR.into(), Value::String(self.identity.0.clone()));
        for (field, value) in &self.fields {
            record.insert(field.key().into(), value.to_json());
        }
        for (key, raw) in &self.extra {
            if !record.contains_key(key) {
                record.insert(key.clone(), raw.clone());
            }
        }
        record
    }

    /// Pretty JSON with two-space indentation.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Value::Object(self.to_record()))
    }

    /// Decode a record previously written by [`Snapshot::to_json`].
    pub fn from_stored(raw: &str) -> Result<Snapshot, RecordError> {
        let Value::Object(record) = serde_json::from_str::<Value>(raw)? else {
            return Err(RecordError::NotAnObject);
        };

        let identity = match record.get(FORM_ID_ATTR) {
            Some(Value::String(id)) if !id.is_empty() => FormId(id.clone()),
            _ => return Err(RecordError::MissingAttribute(FORM_ID_ATTR)),
        };
        let timestamp = match record.get(TIMESTAMP_ATTR) {
            Some(Value::String(ts)) => DateTime::parse_from_rfc3339(ts)
                .map_err(|_| RecordError::InvalidTimestamp(ts.clone()))?
                .with_timezone(&Utc),
            _ => return Err(RecordError::MissingAttribute(TIMESTAMP_ATTR)),
        };

        Ok(Snapshot::from_record(identity, timestamp, record))
    }

    pub fn value(&self, field: Field) -> Option<&FieldValue> {
        self.fields.get(&field)
    }

    pub fn text(&self, field: Field) -> Option<&str> {
        self.value(field).and_then(FieldValue::as_str)
    }

    pub fn is_checked(&self, field: Field) -> bool {
        self.value(field).is_some_and(FieldValue::is_checked)
    }

    pub fn set(&mut self, field: Field, value: FieldValue) {
        self.fields.insert(field, value);
    }
}

// ============================================================================
// Capture & apply
// ============================================================================

/// Assemble a snapshot from the presentation layer's controls.
///
/// Text and select controls give their value, checkboxes their state, and
/// each radio group the first checked option (null when none is checked).
/// `carried` extras are kept unless a control now supplies the same key.
pub fn capture_from_form(
    identity: FormId,
    controls: &[Control],
    carried: &Map<String, Value>,
) -> Snapshot {
    let mut record = Map::new();
    let mut radio_groups = Map::new();

    for control in controls {
        match control {
            Control::Text { name, value } => {
                record.insert(name.clone(), Value::String(value.clone()));
            }
            Control::Checkbox { name, checked } => {
                record.insert(name.clone(), Value::Bool(*checked));
            }
            Control::Radio { name, value, checked } => {
                let slot = radio_groups.entry(name.clone()).or_insert(Value::Null);
                if slot.is_null() && *checked {
                    *slot = Value::String(value.clone());
                }
            }
        }
    }
    record.extend(radio_groups);

    for (key, raw) in carried {
        if !record.contains_key(key) {
            record.insert(key.clone(), raw.clone());
        }
    }

    Snapshot::from_record(identity, Utc::now(), record)
}

/// Push every stored answer into the matching control. Returns how many the
/// presentation layer recognized. Visibility must be re-derived afterwards.
pub fn apply_to_form<P: PresentationPort + ?Sized>(snapshot: &Snapshot, port: &mut P) -> usize {
    snapshot
        .fields
        .iter()
        .filter(|(field, value)| port.write_answer(field.key(), value))
        .count()
}

/// Return every schema field's control to its initial value.
pub fn reset_form<P: PresentationPort + ?Sized>(port: &mut P) {
    for &field in Field::ALL {
        let initial = match field.kind() {
            FieldKind::Text | FieldKind::Select => FieldValue::Text(field.default_value().to_string()),
            FieldKind::Checkbox => FieldValue::Toggle(false),
            FieldKind::Radio(_) => FieldValue::Choice(None),
        };
        port.write_answer(field.key(), &initial);
    }
}
