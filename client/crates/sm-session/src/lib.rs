//! Client-side session and identity persistence.
//!
//! Keeps the signed-in identity, its credential token and its profile image
//! consistent across the in-memory state, the session store, the durable
//! store and other tabs sharing the same durable store.

pub mod cache_bust;
pub mod cross_tab;
pub mod error;
pub mod hooks;
pub mod identity;
pub mod orchestrator;
pub mod service;
pub mod storage;

#[cfg(test)]
mod tests;

pub use cache_bust::{CacheBustPolicy, Clock, ManualClock, SystemClock};
pub use cross_tab::{CrossTabNotifier, CrossTabSignal, ObservedStore, StorageEvent, StorageEventBus, TabId};
pub use error::{Result, SessionError, StorageError, StorageResult};
pub use hooks::{DispatchOutcome, PendingUpdate, SessionHooks, SessionIntent};
pub use identity::{IdentityRecord, ImageRef, ProfilePatch, Role};
pub use orchestrator::{PersistReport, SessionOrchestrator, SessionState, SyncState, UpdateTicket};
pub use service::{Credentials, HttpIdentityService, IdentityService, LoginResponse, ServiceError};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageTier, StorageTierAdapter, WriteOutcome};
