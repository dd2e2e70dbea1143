pub mod cross_tab_notifier;
pub mod observed_store;
pub mod storage_event;
pub mod storage_event_bus;

pub use cross_tab_notifier::{CrossTabNotifier, CrossTabSignal, WATCHED_KEYS};
pub use observed_store::ObservedStore;
pub use storage_event::{StorageEvent, TabId};
pub use storage_event_bus::StorageEventBus;
