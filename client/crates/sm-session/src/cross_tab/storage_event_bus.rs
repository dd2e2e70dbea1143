use crate::StorageEvent;

use tokio::sync::broadcast;

pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Fan-out of durable-store mutations to every tab of the same origin.
#[derive(Debug, Clone)]
pub struct StorageEventBus {
    sender: broadcast::Sender<StorageEvent>,
}

impl StorageEventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Returns the number of tabs that will see the event.
    pub fn publish(&self, event: StorageEvent) -> usize {
        match self.sender.send(event) {
            Ok(receiver_count) => receiver_count,
            Err(_) => {
                // No tab is listening
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.sender.subscribe()
    }
}

impl Default for StorageEventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}
