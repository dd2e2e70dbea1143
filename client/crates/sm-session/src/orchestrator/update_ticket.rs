use crate::ProfilePatch;

/// Handle for one optimistic profile update awaiting the server.
///
/// Sequence numbers are strictly increasing per orchestrator; a response for
/// a ticket older than the latest committed one is discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTicket {
    sequence: u64,
    patch: ProfilePatch,
}

impl UpdateTicket {
    pub(crate) fn new(sequence: u64, patch: ProfilePatch) -> Self {
        Self { sequence, patch }
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn patch(&self) -> &ProfilePatch {
        &self.patch
    }
}
