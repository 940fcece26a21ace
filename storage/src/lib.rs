//! Scoped key-value persistence shared by the whiteboard and proctoring crates.
//!
//! Both cores persist a single JSON array per scope (question or interview).
//! This crate owns the storage seam (`KeyValueStore`), the key layout, and the
//! JSON helpers, so the cores stay testable against `MemoryStore` and only the
//! browser build touches `window.localStorage` (feature `web`).

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Prefix for whiteboard documents, one per question.
pub const WHITEBOARD_KEY_PREFIX: &str = "whiteboard_";

/// Prefix for proctoring event logs, one per interview.
pub const PROCTORING_EVENTS_KEY_PREFIX: &str = "proctoring_events_";

/// Error returned by store backends and the JSON helpers.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The stored value under `key` is not valid JSON for the requested type.
    #[error("corrupt value under {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    /// The value could not be serialized.
    #[error("failed to serialize value: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The backend rejected the operation (quota exceeded, access denied, ...).
    #[error("storage backend error: {0}")]
    Backend(String),
    /// No backend is available in this environment.
    #[error("storage unavailable")]
    Unavailable,
}

/// Storage key for the whiteboard document of `question_id`.
#[must_use]
pub fn whiteboard_key(question_id: &str) -> String {
    format!("{WHITEBOARD_KEY_PREFIX}{question_id}")
}

/// Storage key for the proctoring event log of `interview_id`.
#[must_use]
pub fn proctoring_events_key(interview_id: &str) -> String {
    format!("{PROCTORING_EVENTS_KEY_PREFIX}{interview_id}")
}

/// String-keyed, string-valued persistence.
pub trait KeyValueStore {
    /// Raw value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the backend rejects the write.
    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;

    /// Delete the value under `key`. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the backend rejects the delete.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Load and decode the JSON value stored under `key`.
///
/// Returns `Ok(None)` when nothing is stored.
///
/// # Errors
///
/// Returns [`StorageError::Corrupt`] when the stored text does not decode as `T`.
pub fn load_json<T: DeserializeOwned>(store: &impl KeyValueStore, key: &str) -> Result<Option<T>, StorageError> {
    let Some(raw) = store.get(key) else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Corrupt { key: key.to_owned(), source })
}

/// Encode `value` as JSON and store it under `key`.
///
/// # Errors
///
/// Returns [`StorageError::Serialize`] if encoding fails, or the backend's error.
pub fn save_json<T: Serialize + ?Sized>(store: &mut impl KeyValueStore, key: &str, value: &T) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, raw)
}

/// In-memory store. Used by tests and headless report generation.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys starting with `prefix`, sorted.
    #[must_use]
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        keys
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Browser `window.localStorage` backend.
#[cfg(feature = "web")]
pub struct LocalStore {
    storage: web_sys::Storage,
}

#[cfg(feature = "web")]
impl LocalStore {
    /// Bind to the current window's `localStorage`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] outside a browser window or when
    /// storage access is blocked.
    pub fn new() -> Result<Self, StorageError> {
        let window = web_sys::window().ok_or(StorageError::Unavailable)?;
        match window.local_storage() {
            Ok(Some(storage)) => Ok(Self { storage }),
            Ok(None) => Err(StorageError::Unavailable),
            Err(e) => Err(StorageError::Backend(format!("{e:?}"))),
        }
    }
}

#[cfg(feature = "web")]
impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = ?e, "localStorage read failed");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.storage
            .set_item(key, &value)
            .map_err(|e| StorageError::Backend(format!("{e:?}")))
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|e| StorageError::Backend(format!("{e:?}")))
    }
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
