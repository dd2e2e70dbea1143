use crate::{KeyValueStore, MemoryStore, SessionError, StorageTier};

use log::warn;

/// Result of a best-effort write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Persisted,
    Failed,
}

impl WriteOutcome {
    pub fn is_persisted(self) -> bool {
        matches!(self, Self::Persisted)
    }
}

/// Uniform access to the durable, session and memory tiers.
///
/// Never returns an error: a failing store is logged and treated as absent
/// (reads) or not persisted (writes), so callers keep running from memory.
pub struct StorageTierAdapter {
    durable: Box<dyn KeyValueStore>,
    session: Box<dyn KeyValueStore>,
    memory: MemoryStore,
}

impl StorageTierAdapter {
    pub fn new(
        durable: impl KeyValueStore + 'static,
        session: impl KeyValueStore + 'static,
    ) -> Self {
        Self {
            durable: Box::new(durable),
            session: Box::new(session),
            memory: MemoryStore::new(),
        }
    }

    fn store(&self, tier: StorageTier) -> &dyn KeyValueStore {
        match tier {
            StorageTier::Durable => self.durable.as_ref(),
            StorageTier::Session => self.session.as_ref(),
            StorageTier::Memory => &self.memory,
        }
    }

    /// Reads `key`; blank values count as absent.
    pub fn read(&self, tier: StorageTier, key: &str) -> Option<String> {
        match self.store(tier).get(key) {
            Ok(value) => value.filter(|v| !v.trim().is_empty()),
            Err(e) => {
                let err = SessionError::storage_unavailable(tier, key, e);
                warn!("Read degraded to absent: {err}");
                None
            }
        }
    }

    pub fn write(&self, tier: StorageTier, key: &str, value: &str) -> WriteOutcome {
        match self.store(tier).set(key, value) {
            Ok(()) => WriteOutcome::Persisted,
            Err(e) => {
                let err = SessionError::storage_unavailable(tier, key, e);
                warn!("Write not persisted, continuing in memory: {err}");
                WriteOutcome::Failed
            }
        }
    }

    pub fn remove(&self, tier: StorageTier, key: &str) -> WriteOutcome {
        match self.store(tier).remove(key) {
            Ok(()) => WriteOutcome::Persisted,
            Err(e) => {
                let err = SessionError::storage_unavailable(tier, key, e);
                warn!("Remove not persisted: {err}");
                WriteOutcome::Failed
            }
        }
    }
}
