use crate::service::ServiceResult;
use crate::{IdentityRecord, IdentityService, UpdateTicket};

use std::sync::Arc;

/// A staged profile update holding everything the server call needs.
///
/// Sending borrows nothing from the hooks, so several updates can be in flight
/// at once. Each result goes back through
/// [`SessionHooks::finish_profile_update`](crate::SessionHooks::finish_profile_update),
/// which drops replies older than the newest one already saved.
pub struct PendingUpdate<S> {
    ticket: UpdateTicket,
    token: String,
    service: Arc<S>,
}

impl<S: IdentityService> PendingUpdate<S> {
    pub(crate) fn new(ticket: UpdateTicket, token: String, service: Arc<S>) -> Self {
        Self {
            ticket,
            token,
            service,
        }
    }

    pub fn ticket(&self) -> &UpdateTicket {
        &self.ticket
    }

    pub async fn send(&self) -> ServiceResult<IdentityRecord> {
        self.service
            .update_identity(&self.token, self.ticket.patch())
            .await
    }
}
