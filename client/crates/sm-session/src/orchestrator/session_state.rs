use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    /// In-memory identity matches what the server confirmed
    Fresh,
    /// An update is in flight to the server
    Syncing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    Unauthenticated,
    Authenticated { sync: SyncState },
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    pub fn is_syncing(&self) -> bool {
        matches!(
            self,
            Self::Authenticated {
                sync: SyncState::Syncing
            }
        )
    }
}
