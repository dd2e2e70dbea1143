use crate::{KeyValueStore, StorageError, StorageResult};

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// In-process store. Clones share the same entries.
///
/// An optional byte quota and a disabled switch reproduce the ways browser
/// storage refuses writes (quota exceeded, storage blocked by settings).
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: HashMap<String, String>,
    quota_bytes: Option<usize>,
    disabled: bool,
}

impl MemoryInner {
    fn used_bytes_excluding(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that refuses writes once keys plus values exceed `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        let store = Self::default();
        if let Ok(mut inner) = store.inner.lock() {
            inner.quota_bytes = Some(quota_bytes);
        }
        store
    }

    /// Simulate storage being blocked (private browsing, disabled cookies).
    pub fn set_disabled(&self, disabled: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.disabled = disabled;
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|inner| inner.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, MemoryInner>> {
        let inner = self.inner.lock().map_err(|_| StorageError::poisoned())?;
        if inner.disabled {
            return Err(StorageError::disabled());
        }
        Ok(inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.lock()?.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut inner = self.lock()?;

        if let Some(quota) = inner.quota_bytes {
            let needed = key.len() + value.len();
            let available = quota.saturating_sub(inner.used_bytes_excluding(key));
            if needed > available {
                return Err(StorageError::quota_exceeded(key, needed, available));
            }
        }

        inner.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.lock()?.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        let mut keys: Vec<String> = self.lock()?.entries.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    fn clear(&self) -> StorageResult<()> {
        self.lock()?.entries.clear();
        Ok(())
    }
}
