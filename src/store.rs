//! Durable preference storage.
//!
//! DESIGN
//! ======
//! The browser exposes one string key-value store (`localStorage`) that can be
//! disabled, full, or blocked by privacy settings. Every access is therefore
//! fallible and callers decide whether a failure matters. The theme
//! controller never surfaces these errors; it logs them and carries on with
//! the in-document state only.

use std::collections::HashMap;

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;

/// Errors produced by a durable store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store is not available in this environment (e.g. storage disabled).
    #[error("storage unavailable")]
    Unavailable,

    /// The store refused the operation.
    #[error("storage rejected {op} for key {key}: {reason}")]
    Rejected { op: &'static str, key: String, reason: String },
}

/// String key-value store surviving page reloads.
pub trait PreferenceStore {
    /// Read the value stored under `key`, `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store rejects the write.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key` if present.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be modified.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store. Used natively and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one entry.
    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.to_owned(), value.to_owned());
        Self { entries }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store that fails every operation, as a browser with storage disabled does.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledStore;

impl PreferenceStore for DisabledStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable)
    }

    fn remove(&mut self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable)
    }
}
