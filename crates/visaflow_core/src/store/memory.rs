//! In-process store with browser-storage style quota accounting.

use super::{decode, encode, KeyValueStore, StoreError, StoreResult};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;

/// Single-threaded in-memory store.
///
/// Values are kept in their serialized form so quota accounting matches what
/// a string-backed host storage would charge: the sum of key and value bytes
/// across all entries.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    /// Creates an unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that rejects writes once `quota_bytes` would be exceeded.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Total bytes currently charged against the quota.
    pub fn used_bytes(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }

    /// Raw serialized text stored under `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    /// Stores raw text without validation; used to seed legacy payloads.
    pub fn insert_raw(&self, key: impl Into<String>, text: impl Into<String>) {
        self.entries.borrow_mut().insert(key.into(), text.into());
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        match self.entries.borrow().get(key) {
            Some(text) => decode(key, text).map(Some),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &Value) -> StoreResult<()> {
        let text = encode(key, value)?;

        if let Some(quota_bytes) = self.quota_bytes {
            let replaced = self
                .entries
                .borrow()
                .get(key)
                .map_or(0, |old| key.len() + old.len());
            let required_bytes = self.used_bytes() - replaced + key.len() + text.len();
            if required_bytes > quota_bytes {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    required_bytes,
                    quota_bytes,
                });
            }
        }

        self.entries.borrow_mut().insert(key.to_string(), text);
        Ok(())
    }
}
