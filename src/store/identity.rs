use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::store::kv::{KeyValueStore, StorageError};
use crate::store::layout::CURRENT_FORM_ID_KEY;

/// Namespace prefix of generated identities.
pub const FORM_ID_PREFIX: &str = "sso-";

/// Opaque per-session identity scoping every persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormId(pub String);

impl FormId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hands out the session identity, creating and persisting it lazily.
#[derive(Debug, Default)]
pub struct IdentityManager {
    cached: Option<FormId>,
    last_issued_ms: Option<i64>,
}

impl IdentityManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the stored identity, generating one on first access.
    pub fn get_identity<S: KeyValueStore>(&mut self, store: &mut S) -> Result<FormId, StorageError> {
        if let Some(id) = &self.cached {
            return Ok(id.clone());
        }

        let id = match store.get(CURRENT_FORM_ID_KEY)? {
            Some(existing) if !existing.is_empty() => FormId(existing),
            _ => {
                let fresh = self.generate();
                store.set(CURRENT_FORM_ID_KEY, fresh.as_str())?;
                tracing::info!(form_id = %fresh, "generated new form identity");
                fresh
            }
        };

        self.cached = Some(id.clone());
        Ok(id)
    }

    /// Drop the cached identity and delete the stored one.
    pub fn clear<S: KeyValueStore>(&mut self, store: &mut S) -> Result<(), StorageError> {
        let current = match self.cached.take() {
            Some(id) => Some(id.0),
            None => store.get(CURRENT_FORM_ID_KEY)?,
        };
        if let Some(ms) = current
            .as_deref()
            .and_then(|id| id.strip_prefix(FORM_ID_PREFIX))
            .and_then(|suffix| suffix.parse::<i64>().ok())
        {
            self.last_issued_ms = Some(self.last_issued_ms.map_or(ms, |last| last.max(ms)));
        }
        store.delete(CURRENT_FORM_ID_KEY)
    }

    /// Time-based token. Strictly increasing within this manager, so an
    /// identity issued right after a clear never repeats the cleared one.
    fn generate(&mut self) -> FormId {
        let now = Utc::now().timestamp_millis();
        let ms = match self.last_issued_ms {
            Some(last) if now <= last => last + 1,
            _ => now,
        };
        self.last_issued_ms = Some(ms);
        FormId(format!("{FORM_ID_PREFIX}{ms}"))
    }
}
