use crate::identity::codec;
use crate::orchestrator::{PersistReport, SessionState, SyncState, UpdateTicket};
use crate::storage::storage_keys::{
    CACHED_PROFILE_IMAGE, DURABLE_SESSION_KEYS, MEMORY_SESSION_KEYS, PROFILE_IMAGE, REMEMBER_ME,
    SESSION_SESSION_KEYS, TOKEN, USER,
};
use crate::{
    CacheBustPolicy, IdentityRecord, ImageRef, ProfilePatch, Result as SessionResult,
    SessionError, StorageEvent, StorageTier, StorageTierAdapter, WriteOutcome,
};

use std::collections::BTreeMap;

use log::{debug, info, warn};

/// Sole writer of identity data across the memory, session and durable tiers.
///
/// Reads merge the tiers by priority (memory, explicit argument, session
/// image cache, durable record) and writes fan out to every tier. Mutating
/// operations are crate-private; `SessionHooks` is the public entry point.
pub struct SessionOrchestrator {
    storage: StorageTierAdapter,
    cache_bust: CacheBustPolicy,
    /// In-memory identity handed to the UI, image already cache-busted
    identity: Option<IdentityRecord>,
    /// Last identity confirmed by the server or loaded from storage, raw image
    confirmed: Option<IdentityRecord>,
    token: Option<String>,
    /// Optimistic patches awaiting the server, by sequence
    pending: BTreeMap<u64, ProfilePatch>,
    next_sequence: u64,
    latest_committed: u64,
}

impl SessionOrchestrator {
    pub fn new(storage: StorageTierAdapter, cache_bust: CacheBustPolicy) -> Self {
        Self {
            storage,
            cache_bust,
            identity: None,
            confirmed: None,
            token: None,
            pending: BTreeMap::new(),
            next_sequence: 0,
            latest_committed: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.identity.is_none() || self.token.is_none() {
            return SessionState::Unauthenticated;
        }

        let sync = if self.pending.is_empty() {
            SyncState::Fresh
        } else {
            SyncState::Syncing
        };
        SessionState::Authenticated { sync }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Device-level preference; survives logout.
    pub fn remember_me(&self) -> bool {
        self.storage
            .read(StorageTier::Durable, REMEMBER_ME)
            .is_some_and(|v| v == "true")
    }

    pub fn merged_identity(&self) -> Option<IdentityRecord> {
        self.merged_identity_with(None)
    }

    /// Merged identity where `explicit` fills in the image when memory has none.
    pub fn merged_identity_with(&self, explicit: Option<&ImageRef>) -> Option<IdentityRecord> {
        let record = self.identity.clone()?;
        let profile_image = self.resolve_image(explicit);
        Some(IdentityRecord {
            profile_image,
            ..record
        })
    }

    /// First non-empty of: memory, `explicit`, session cache, durable record,
    /// durable standalone image. Network URLs come back cache-busted.
    pub fn resolve_image(&self, explicit: Option<&ImageRef>) -> Option<ImageRef> {
        let raw = self.resolve_raw_image(explicit)?;
        self.sanitize_image(&raw, false)
    }

    // =========================================================================
    // Lifecycle transitions
    // =========================================================================

    /// Loads the stored session into memory.
    ///
    /// A corrupt record is purged. A record without a credential token is left
    /// on disk but not loaded. When the session image cache disagrees with the
    /// durable record, the session copy wins and is written back.
    pub(crate) fn rehydrate(&mut self) -> PersistReport {
        let mut report = PersistReport::default();
        let token = self.read_token();

        let stored = match self.storage.read(StorageTier::Durable, USER) {
            None => None,
            Some(raw) => match codec::decode(&raw) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Discarding stored identity: {e}");
                    report.record(
                        StorageTier::Durable,
                        USER,
                        self.storage.remove(StorageTier::Durable, USER),
                    );
                    None
                }
            },
        };

        let (Some(record), Some(token)) = (stored, token) else {
            if self.identity.is_some() {
                info!("Stored session is gone, clearing in-memory identity");
            } else {
                debug!("No stored session to rehydrate");
            }
            self.clear_memory();
            return report;
        };

        let resolved = self
            .session_cached_image()
            .or_else(|| codec::extract_image(&record).cloned())
            .or_else(|| self.durable_standalone_image());
        let reconciled = codec::merge_image(record.clone(), resolved);

        if reconciled != record {
            info!("Session image cache differs from durable record, writing it back");
            report.merge(self.write_record(&reconciled));
        }

        info!("Rehydrated identity {} ({})", reconciled.id, reconciled.role);
        self.token = Some(token);
        self.confirmed = Some(reconciled);
        self.identity = self.recompute();
        report
    }

    pub(crate) fn apply_login(
        &mut self,
        record: IdentityRecord,
        token: String,
        remember_me: bool,
    ) -> PersistReport {
        let mut report = PersistReport::default();

        let stored = self.stored_record();
        let same_identity = stored.as_ref().is_none_or(|s| s.id == record.id)
            && self.confirmed.as_ref().is_none_or(|c| c.id == record.id);

        let record = if same_identity {
            self.carry_forward_image(record, stored.as_ref())
        } else {
            report.merge(self.forget_images());
            record
        };

        report.record(
            StorageTier::Durable,
            REMEMBER_ME,
            self.storage.write(
                StorageTier::Durable,
                REMEMBER_ME,
                if remember_me { "true" } else { "false" },
            ),
        );

        let (keep, drop) = if remember_me {
            (StorageTier::Durable, StorageTier::Session)
        } else {
            (StorageTier::Session, StorageTier::Durable)
        };
        report.record(keep, TOKEN, self.storage.write(keep, TOKEN, &token));
        report.record(drop, TOKEN, self.storage.remove(drop, TOKEN));

        report.merge(self.write_record(&record));
        if let Some(image) = codec::extract_image(&record) {
            report.merge(self.cache_image(image));
        }

        info!(
            "Signed in {} as {} (remember me: {remember_me})",
            record.id, record.role
        );
        self.token = Some(token);
        self.confirmed = Some(self.storable(&record));
        self.pending.clear();
        self.identity = self.recompute();
        report
    }

    /// Applies `patch` to memory only and returns a ticket for the server call.
    pub(crate) fn begin_profile_update(
        &mut self,
        patch: ProfilePatch,
    ) -> SessionResult<UpdateTicket> {
        if !self.state().is_authenticated() {
            return Err(SessionError::not_authenticated());
        }

        self.next_sequence += 1;
        let sequence = self.next_sequence;
        self.pending.insert(sequence, patch.clone());
        self.identity = self.recompute();

        debug!("Profile update #{sequence} in flight");
        Ok(UpdateTicket::new(sequence, patch))
    }

    /// Persists the server-confirmed record for `ticket`.
    pub(crate) fn commit_profile_update(
        &mut self,
        ticket: &UpdateTicket,
        confirmed: IdentityRecord,
    ) -> PersistReport {
        let sequence = ticket.sequence();
        self.pending.remove(&sequence);

        if sequence < self.latest_committed {
            warn!(
                "Discarding stale profile update #{sequence} (#{} already applied)",
                self.latest_committed
            );
            self.identity = self.recompute();
            return PersistReport::default();
        }

        let Some(previous) = self.confirmed.as_ref() else {
            warn!("Discarding profile update #{sequence} that completed after sign-out");
            return PersistReport::default();
        };

        if previous.id != confirmed.id {
            warn!(
                "Discarding profile update #{sequence} for {} while signed in as {}",
                confirmed.id, previous.id
            );
            self.identity = self.recompute();
            return PersistReport::default();
        }

        let image = confirmed
            .profile_image
            .clone()
            .or_else(|| ticket.patch().profile_image.clone())
            .or_else(|| previous.profile_image.clone());
        let record = codec::merge_image(confirmed, image);

        let mut report = self.write_record(&record);
        if ticket.patch().touches_image()
            && let Some(image) = codec::extract_image(&record)
        {
            report.merge(self.cache_image(image));
            self.cache_bust
                .bust(&self.storage, Some(image.as_str()), true);
        }

        info!("Profile update #{sequence} saved for {}", record.id);
        self.latest_committed = sequence;
        self.confirmed = Some(self.storable(&record));
        self.identity = self.recompute();
        report
    }

    /// Drops the optimistic patch for `ticket`; persisted tiers are untouched.
    pub(crate) fn rollback_profile_update(&mut self, ticket: &UpdateTicket) {
        if self.pending.remove(&ticket.sequence()).is_some() {
            warn!("Rolled back profile update #{}", ticket.sequence());
        }
        self.identity = self.recompute();
    }

    /// Mints a new cache-bust token for the current image.
    pub(crate) fn force_refresh_image(&mut self) -> Option<ImageRef> {
        self.identity.as_ref()?;

        let raw = self.resolve_raw_image(None)?;
        let refreshed = self.sanitize_image(&raw, true)?;
        if let Some(identity) = self.identity.as_mut() {
            identity.profile_image = Some(refreshed.clone());
        }

        info!("Refreshed profile image: {refreshed}");
        Some(refreshed)
    }

    /// Removes every session artifact. `rememberMe` is kept.
    pub(crate) fn purge(&mut self) -> PersistReport {
        let mut report = PersistReport::default();

        for key in DURABLE_SESSION_KEYS {
            report.record(
                StorageTier::Durable,
                key,
                self.storage.remove(StorageTier::Durable, key),
            );
        }
        for key in SESSION_SESSION_KEYS {
            report.record(
                StorageTier::Session,
                key,
                self.storage.remove(StorageTier::Session, key),
            );
        }
        for key in MEMORY_SESSION_KEYS {
            self.storage.remove(StorageTier::Memory, key);
        }

        if let Some(identity) = &self.confirmed {
            info!("Signed out {}", identity.id);
        }
        self.clear_memory();
        report
    }

    /// Another tab changed the durable store: adopt its image, then re-read.
    pub(crate) fn handle_storage_event(&mut self, event: &StorageEvent) -> PersistReport {
        debug!(
            "Storage event from tab {}: '{}' changed",
            event.origin, event.key
        );
        self.resync()
    }

    /// Re-reads every tier, e.g. after missing cross-tab events.
    pub(crate) fn resync(&mut self) -> PersistReport {
        self.adopt_durable_image();
        self.rehydrate()
    }

    #[cfg(test)]
    pub(crate) fn storage(&self) -> &StorageTierAdapter {
        &self.storage
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn clear_memory(&mut self) {
        self.identity = None;
        self.confirmed = None;
        self.token = None;
        self.pending.clear();
    }

    /// Confirmed identity with still-pending patches applied in order.
    fn recompute(&self) -> Option<IdentityRecord> {
        let mut record = self.confirmed.clone()?;
        for patch in self.pending.range(self.latest_committed + 1..).map(|(_, p)| p) {
            record = patch.apply_to(&record);
        }
        Some(self.sanitize(record, false))
    }

    fn read_token(&self) -> Option<String> {
        let (first, second) = if self.remember_me() {
            (StorageTier::Durable, StorageTier::Session)
        } else {
            (StorageTier::Session, StorageTier::Durable)
        };
        self.storage
            .read(first, TOKEN)
            .or_else(|| self.storage.read(second, TOKEN))
    }

    fn resolve_raw_image(&self, explicit: Option<&ImageRef>) -> Option<ImageRef> {
        self.identity
            .as_ref()
            .and_then(codec::extract_image)
            .or(explicit)
            .map(|image| self.raw(image))
            .or_else(|| self.session_cached_image())
            .or_else(|| self.stored_record().and_then(|r| r.profile_image))
            .or_else(|| self.durable_standalone_image())
    }

    /// Identity owned by this record's id keeps its earlier image.
    fn carry_forward_image(
        &self,
        record: IdentityRecord,
        stored: Option<&IdentityRecord>,
    ) -> IdentityRecord {
        if record.profile_image.is_some() {
            return record;
        }

        let previous = self
            .confirmed
            .as_ref()
            .and_then(|c| c.profile_image.clone())
            .or_else(|| self.session_cached_image())
            .or_else(|| stored.and_then(|s| s.profile_image.clone()))
            .or_else(|| self.durable_standalone_image());

        if let Some(image) = &previous {
            debug!("Carrying forward profile image {image} for {}", record.id);
        }
        codec::merge_image(record, previous)
    }

    fn adopt_durable_image(&self) {
        let image = self
            .durable_standalone_image()
            .or_else(|| self.stored_record().and_then(|r| r.profile_image));

        match image {
            Some(image) => {
                self.storage
                    .write(StorageTier::Session, CACHED_PROFILE_IMAGE, image.as_str());
            }
            None => {
                self.storage
                    .remove(StorageTier::Session, CACHED_PROFILE_IMAGE);
            }
        }
    }

    fn write_record(&self, record: &IdentityRecord) -> PersistReport {
        let mut report = PersistReport::default();
        let outcome = match codec::encode(&self.storable(record)) {
            Ok(encoded) => self.storage.write(StorageTier::Durable, USER, &encoded),
            Err(e) => {
                warn!("Identity not persisted: {e}");
                WriteOutcome::Failed
            }
        };
        report.record(StorageTier::Durable, USER, outcome);
        report
    }

    /// Standalone image copies that outlive a damaged full record.
    fn cache_image(&self, image: &ImageRef) -> PersistReport {
        let mut report = PersistReport::default();
        let raw = self.raw(image);
        report.record(
            StorageTier::Session,
            CACHED_PROFILE_IMAGE,
            self.storage
                .write(StorageTier::Session, CACHED_PROFILE_IMAGE, raw.as_str()),
        );
        report.record(
            StorageTier::Durable,
            PROFILE_IMAGE,
            self.storage
                .write(StorageTier::Durable, PROFILE_IMAGE, raw.as_str()),
        );
        report
    }

    fn forget_images(&self) -> PersistReport {
        let mut report = PersistReport::default();
        report.record(
            StorageTier::Session,
            CACHED_PROFILE_IMAGE,
            self.storage
                .remove(StorageTier::Session, CACHED_PROFILE_IMAGE),
        );
        report.record(
            StorageTier::Durable,
            PROFILE_IMAGE,
            self.storage.remove(StorageTier::Durable, PROFILE_IMAGE),
        );
        report
    }

    fn stored_record(&self) -> Option<IdentityRecord> {
        self.storage
            .read(StorageTier::Durable, USER)
            .and_then(|raw| codec::decode(&raw).ok())
    }

    fn session_cached_image(&self) -> Option<ImageRef> {
        self.storage
            .read(StorageTier::Session, CACHED_PROFILE_IMAGE)
            .and_then(ImageRef::new)
    }

    fn durable_standalone_image(&self) -> Option<ImageRef> {
        self.storage
            .read(StorageTier::Durable, PROFILE_IMAGE)
            .and_then(ImageRef::new)
    }

    /// Image reference without the cache-bust parameter.
    fn raw(&self, image: &ImageRef) -> ImageRef {
        ImageRef::new(self.cache_bust.strip(image.as_str())).unwrap_or_else(|| image.clone())
    }

    fn sanitize_image(&self, image: &ImageRef, force_new: bool) -> Option<ImageRef> {
        self.cache_bust
            .bust(&self.storage, Some(image.as_str()), force_new)
            .and_then(ImageRef::new)
    }

    fn sanitize(&self, record: IdentityRecord, force_new: bool) -> IdentityRecord {
        let profile_image = record
            .profile_image
            .as_ref()
            .and_then(|image| self.sanitize_image(image, force_new));
        IdentityRecord {
            profile_image,
            ..record
        }
    }

    /// Copy of `record` with its image stripped of the cache-bust parameter.
    fn storable(&self, record: &IdentityRecord) -> IdentityRecord {
        IdentityRecord {
            profile_image: record.profile_image.as_ref().map(|image| self.raw(image)),
            ..record.clone()
        }
    }
}
