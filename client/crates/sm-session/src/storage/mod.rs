pub mod file_store;
pub mod key_value_store;
pub mod memory_store;
pub mod storage_keys;
pub mod storage_tier;
pub mod tier_adapter;

pub use file_store::FileStore;
pub use key_value_store::KeyValueStore;
pub use memory_store::MemoryStore;
pub use storage_tier::StorageTier;
pub use tier_adapter::{StorageTierAdapter, WriteOutcome};
