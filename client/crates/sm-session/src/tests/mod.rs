mod cache_bust;
mod codec;

use crate::cache_bust::DEFAULT_QUERY_PARAM;
use crate::{
    CacheBustPolicy, IdentityRecord, ImageRef, ManualClock, MemoryStore, Role,
    SessionOrchestrator, StorageTierAdapter,
};

use std::sync::Arc;

pub(crate) const START_MILLIS: i64 = 1_700_000_000_000;

/// Durable and session stores the test can inspect behind the orchestrator's back.
pub(crate) struct Fixture {
    pub(crate) durable: MemoryStore,
    pub(crate) session: MemoryStore,
    pub(crate) clock: ManualClock,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        Self {
            durable: MemoryStore::new(),
            session: MemoryStore::new(),
            clock: ManualClock::new(START_MILLIS),
        }
    }

    pub(crate) fn adapter(&self) -> StorageTierAdapter {
        StorageTierAdapter::new(self.durable.clone(), self.session.clone())
    }

    pub(crate) fn policy(&self) -> CacheBustPolicy {
        CacheBustPolicy::new(DEFAULT_QUERY_PARAM, Arc::new(self.clock.clone()))
    }

    pub(crate) fn orchestrator(&self) -> SessionOrchestrator {
        SessionOrchestrator::new(self.adapter(), self.policy())
    }
}

pub(crate) fn student(id: &str, image: Option<&str>) -> IdentityRecord {
    IdentityRecord {
        id: id.to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        role: Role::Student,
        email: "ada@school.example".to_string(),
        profile_image: image.and_then(ImageRef::new),
    }
}

/// URL without its query string.
pub(crate) fn base_of(image: &ImageRef) -> &str {
    image.as_str().split('?').next().unwrap_or_default()
}

/// Value of the `t` parameter.
pub(crate) fn token_of(image: &ImageRef) -> i64 {
    image
        .as_str()
        .split(['?', '&'])
        .find_map(|pair| pair.strip_prefix("t="))
        .and_then(|t| t.parse().ok())
        .unwrap()
}
