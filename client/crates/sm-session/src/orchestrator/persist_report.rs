use crate::{StorageTier, WriteOutcome};

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedWrite {
    pub tier: &'static str,
    pub key: &'static str,
}

/// Which storage writes of one orchestration step did not persist.
///
/// A non-empty report means the change is live in memory only; the next
/// rehydration reconciles the tiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PersistReport {
    failed: Vec<FailedWrite>,
}

impl PersistReport {
    pub(crate) fn record(&mut self, tier: StorageTier, key: &'static str, outcome: WriteOutcome) {
        if !outcome.is_persisted() {
            self.failed.push(FailedWrite {
                tier: tier.as_str(),
                key,
            });
        }
    }

    pub(crate) fn merge(&mut self, other: PersistReport) {
        self.failed.extend(other.failed);
    }

    pub fn is_fully_persisted(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn failures(&self) -> &[FailedWrite] {
        &self.failed
    }

    pub fn failed_key(&self, tier: StorageTier, key: &str) -> bool {
        self.failed
            .iter()
            .any(|f| f.tier == tier.as_str() && f.key == key)
    }
}
