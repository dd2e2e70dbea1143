use crate::StorageResult;

use std::sync::Arc;

/// A string key-value store in the shape of browser web storage.
///
/// Receivers are `&self` so one store can be shared by several tabs.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    fn remove(&self, key: &str) -> StorageResult<()>;

    fn keys(&self) -> StorageResult<Vec<String>>;

    fn clear(&self) -> StorageResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        (**self).keys()
    }

    fn clear(&self) -> StorageResult<()> {
        (**self).clear()
    }
}
