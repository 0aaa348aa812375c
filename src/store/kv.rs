use std::collections::HashMap;

use thiserror::Error;

// ============================================================================
// Key/value store abstraction
// ============================================================================

/// Failure of the underlying storage medium.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Medium missing, disabled, or failing I/O
    #[error("storage unavailable for key '{key}': {source}")]
    Unavailable {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Write would exceed the store's capacity
    #[error("storage quota exceeded writing '{key}' ({needed} bytes, {limit} allowed)")]
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },

    /// Stored value exists but cannot be decoded
    #[error("stored value for '{key}' is corrupt: {reason}")]
    Corrupt { key: String, reason: String },
}

/// Durable string store. Each call is atomic for its own key only; there is
/// no transaction spanning several keys.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Deleting an absent key is a no-op.
    fn delete(&mut self, key: &str) -> Result<(), StorageError>;
}

// ============================================================================
// In-memory store
// ============================================================================

/// Process-local store, optionally capped to a total byte size the way a
/// browser caps local storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(limit) = self.quota_bytes {
            let needed = self.used_bytes_without(key) + key.len() + value.len();
            if needed > limit {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    limit,
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}
