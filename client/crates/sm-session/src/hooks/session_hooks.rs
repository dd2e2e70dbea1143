use crate::service::ServiceResult;
use crate::{
    CrossTabNotifier, CrossTabSignal, Credentials, DispatchOutcome, IdentityRecord,
    IdentityService, ImageRef, PendingUpdate, PersistReport, ProfilePatch, SessionError,
    SessionIntent, SessionOrchestrator, SessionState,
};

use std::sync::Arc;

use log::{info, warn};

/// The four lifecycle points that drive the orchestrator: app mount, login,
/// profile update and logout. Nothing else writes identity storage.
pub struct SessionHooks<S> {
    orchestrator: SessionOrchestrator,
    service: Arc<S>,
    notifier: Option<CrossTabNotifier>,
}

impl<S: IdentityService> SessionHooks<S> {
    pub fn new(orchestrator: SessionOrchestrator, service: S) -> Self {
        Self {
            orchestrator,
            service: Arc::new(service),
            notifier: None,
        }
    }

    pub fn with_cross_tab(mut self, notifier: CrossTabNotifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn merged_identity(&self) -> Option<IdentityRecord> {
        self.orchestrator.merged_identity()
    }

    pub fn merged_identity_with(&self, explicit: Option<&ImageRef>) -> Option<IdentityRecord> {
        self.orchestrator.merged_identity_with(explicit)
    }

    pub fn state(&self) -> SessionState {
        self.orchestrator.state()
    }

    pub fn orchestrator(&self) -> &SessionOrchestrator {
        &self.orchestrator
    }

    /// Application mount.
    pub fn on_app_mount(&mut self) -> PersistReport {
        self.orchestrator.rehydrate()
    }

    pub async fn dispatch(&mut self, intent: SessionIntent) -> DispatchOutcome {
        match intent {
            SessionIntent::Login {
                credentials,
                remember_me,
            } => self.on_login(&credentials, remember_me).await,
            SessionIntent::Logout => self.before_logout(),
            SessionIntent::UpdateProfile(patch) => self.on_profile_update(patch).await,
            SessionIntent::ForceRefreshImage => self.on_force_refresh_image(),
        }
    }

    /// Persists only after the server accepts the credentials.
    pub async fn on_login(&mut self, credentials: &Credentials, remember_me: bool) -> DispatchOutcome {
        match self.service.login(credentials).await {
            Ok(response) => {
                let report =
                    self.orchestrator
                        .apply_login(response.user, response.token, remember_me);
                DispatchOutcome::Applied { report }
            }
            Err(e) => {
                let err = SessionError::from(e);
                warn!("Login failed: {err}");
                DispatchOutcome::rejected(&err)
            }
        }
    }

    /// Optimistic: memory changes immediately, storage only after the server
    /// confirms, and memory rolls back if it refuses.
    ///
    /// Holds the hooks for the whole round trip. Callers that need several
    /// updates in flight use [`Self::stage_profile_update`] and
    /// [`Self::finish_profile_update`] directly.
    pub async fn on_profile_update(&mut self, patch: ProfilePatch) -> DispatchOutcome {
        if patch.is_empty() {
            return DispatchOutcome::Applied {
                report: PersistReport::default(),
            };
        }

        let pending = match self.stage_profile_update(patch) {
            Ok(pending) => pending,
            Err(outcome) => return outcome,
        };
        let result = pending.send().await;
        self.finish_profile_update(pending, result)
    }

    /// Applies `patch` to memory and returns the server call to make.
    pub fn stage_profile_update(
        &mut self,
        patch: ProfilePatch,
    ) -> Result<PendingUpdate<S>, DispatchOutcome> {
        let ticket = match self.orchestrator.begin_profile_update(patch) {
            Ok(ticket) => ticket,
            Err(e) => {
                warn!("Profile update refused: {e}");
                return Err(DispatchOutcome::rejected(&e));
            }
        };

        let Some(token) = self.orchestrator.token().map(String::from) else {
            self.orchestrator.rollback_profile_update(&ticket);
            return Err(DispatchOutcome::rejected(&SessionError::not_authenticated()));
        };

        Ok(PendingUpdate::new(ticket, token, Arc::clone(&self.service)))
    }

    /// Saves the server's answer for `pending`, or rolls its patch back.
    pub fn finish_profile_update(
        &mut self,
        pending: PendingUpdate<S>,
        result: ServiceResult<IdentityRecord>,
    ) -> DispatchOutcome {
        let ticket = pending.ticket();
        match result {
            Ok(record) => {
                let report = self.orchestrator.commit_profile_update(ticket, record);
                DispatchOutcome::Applied { report }
            }
            Err(e) => {
                let err = SessionError::from(e);
                warn!("Profile update #{} failed: {err}", ticket.sequence());
                self.orchestrator.rollback_profile_update(ticket);
                DispatchOutcome::rejected(&err)
            }
        }
    }

    pub fn on_force_refresh_image(&mut self) -> DispatchOutcome {
        match self.orchestrator.force_refresh_image() {
            Some(_) => DispatchOutcome::Applied {
                report: PersistReport::default(),
            },
            None => DispatchOutcome::Rejected {
                message: "There is no profile image to refresh.".to_string(),
            },
        }
    }

    /// Pre-logout purge.
    pub fn before_logout(&mut self) -> DispatchOutcome {
        let report = self.orchestrator.purge();
        DispatchOutcome::Applied { report }
    }

    /// Applies queued changes from other tabs. Returns how many were handled.
    pub fn poll_cross_tab(&mut self) -> usize {
        let Some(notifier) = self.notifier.as_mut() else {
            return 0;
        };

        let mut signals = Vec::new();
        while let Some(signal) = notifier.try_next() {
            signals.push(signal);
        }

        for signal in &signals {
            match signal {
                CrossTabSignal::Changed(event) => {
                    self.orchestrator.handle_storage_event(event);
                }
                CrossTabSignal::Resync => {
                    info!("Resyncing after missed cross-tab events");
                    self.orchestrator.resync();
                }
            }
        }
        signals.len()
    }
}
