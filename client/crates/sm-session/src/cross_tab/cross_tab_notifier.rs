use crate::storage::storage_keys::{PROFILE_IMAGE, PROFILE_IMAGE_TIMESTAMP, USER};
use crate::{StorageEvent, StorageEventBus, TabId};

use log::{debug, warn};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

/// Keys whose change in another tab must reach this tab.
pub const WATCHED_KEYS: [&str; 3] = [PROFILE_IMAGE, PROFILE_IMAGE_TIMESTAMP, USER];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrossTabSignal {
    /// Another tab changed a watched key
    Changed(StorageEvent),
    /// Events were dropped; the tab must re-read every tier
    Resync,
}

/// Receives storage events from other tabs.
///
/// Events from this tab and for unwatched keys are skipped. Handlers run on
/// the caller's turn; nothing here blocks.
pub struct CrossTabNotifier {
    receiver: broadcast::Receiver<StorageEvent>,
    tab: TabId,
    watched: Vec<String>,
}

impl CrossTabNotifier {
    pub fn subscribe(bus: &StorageEventBus, tab: TabId) -> Self {
        Self {
            receiver: bus.subscribe(),
            tab,
            watched: WATCHED_KEYS.iter().map(|k| k.to_string()).collect(),
        }
    }

    pub fn watching(mut self, keys: &[&str]) -> Self {
        self.watched = keys.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn tab(&self) -> TabId {
        self.tab
    }

    fn is_relevant(&self, event: &StorageEvent) -> bool {
        event.origin != self.tab && self.watched.iter().any(|k| *k == event.key)
    }

    /// Next pending signal, or `None` when nothing is queued.
    pub fn try_next(&mut self) -> Option<CrossTabSignal> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.is_relevant(&event) => {
                    debug!(
                        "Tab {} saw '{}' change in tab {}",
                        self.tab, event.key, event.origin
                    );
                    return Some(CrossTabSignal::Changed(event));
                }
                Ok(_) => continue,
                Err(TryRecvError::Lagged(missed)) => {
                    warn!("Tab {} missed {missed} storage events", self.tab);
                    return Some(CrossTabSignal::Resync);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    /// Waits for the next signal; `None` once every publisher is gone.
    pub async fn next(&mut self) -> Option<CrossTabSignal> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.is_relevant(&event) => {
                    return Some(CrossTabSignal::Changed(event));
                }
                Ok(_) => continue,
                Err(RecvError::Lagged(missed)) => {
                    warn!("Tab {} missed {missed} storage events", self.tab);
                    return Some(CrossTabSignal::Resync);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
