use sm_session::{DispatchOutcome, IdentityRecord, SessionState};

use serde::Serialize;

/// What the binary prints after every command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub session: SessionState,
    pub identity: Option<IdentityRecord>,
    pub remember_me: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<DispatchOutcome>,
}

impl SessionReport {
    pub fn render(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}
