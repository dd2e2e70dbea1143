use crate::{KeyValueStore, StorageEvent, StorageEventBus, StorageResult, TabId};

/// Durable store as seen from one tab: mutations are announced on the bus.
///
/// Like browser storage events, nothing is published when a write leaves the
/// value unchanged.
pub struct ObservedStore<S> {
    inner: S,
    bus: StorageEventBus,
    tab: TabId,
}

impl<S: KeyValueStore> ObservedStore<S> {
    pub fn new(inner: S, bus: StorageEventBus, tab: TabId) -> Self {
        Self { inner, bus, tab }
    }

    fn announce(&self, key: &str, old_value: Option<String>, new_value: Option<String>) {
        self.bus.publish(StorageEvent {
            key: key.to_string(),
            old_value,
            new_value,
            origin: self.tab,
        });
    }
}

impl<S: KeyValueStore> KeyValueStore for ObservedStore<S> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let old_value = self.inner.get(key)?;
        self.inner.set(key, value)?;
        if old_value.as_deref() != Some(value) {
            self.announce(key, old_value, Some(value.to_string()));
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let old_value = self.inner.get(key)?;
        self.inner.remove(key)?;
        if old_value.is_some() {
            self.announce(key, old_value, None);
        }
        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        self.inner.keys()
    }

    fn clear(&self) -> StorageResult<()> {
        let mut removed = Vec::new();
        for key in self.inner.keys()? {
            removed.push((key.clone(), self.inner.get(&key)?));
        }
        self.inner.clear()?;
        for (key, old_value) in removed {
            self.announce(&key, old_value, None);
        }
        Ok(())
    }
}
