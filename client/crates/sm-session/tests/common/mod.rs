#![allow(dead_code)]

use sm_session::service::ServiceResult;
use sm_session::{
    CacheBustPolicy, Credentials, IdentityRecord, IdentityService, ImageRef, LoginResponse,
    ManualClock, MemoryStore, ProfilePatch, Role, ServiceError, SessionHooks, SessionOrchestrator,
    StorageTierAdapter,
};

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

pub const PASSWORD: &str = "correct horse";
pub const START_MILLIS: i64 = 1_700_000_000_000;

/// In-process identity server. Clones share the same account.
#[derive(Clone)]
pub struct FakeIdentityService {
    inner: Arc<FakeInner>,
}

struct FakeInner {
    user: Mutex<IdentityRecord>,
    token: String,
    fail_updates: AtomicBool,
    omit_image: AtomicBool,
    update_calls: AtomicUsize,
}

impl FakeIdentityService {
    pub fn new(user: IdentityRecord) -> Self {
        Self {
            inner: Arc::new(FakeInner {
                user: Mutex::new(user),
                token: "server-token".to_string(),
                fail_updates: AtomicBool::new(false),
                omit_image: AtomicBool::new(false),
                update_calls: AtomicUsize::new(0),
            }),
        }
    }

    pub fn fail_updates(&self, fail: bool) {
        self.inner.fail_updates.store(fail, Ordering::SeqCst);
    }

    /// Replies to updates without the image field, like a partial projection.
    pub fn omit_image(&self, omit: bool) {
        self.inner.omit_image.store(omit, Ordering::SeqCst);
    }

    pub fn update_calls(&self) -> usize {
        self.inner.update_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityService for FakeIdentityService {
    async fn login(&self, credentials: &Credentials) -> ServiceResult<LoginResponse> {
        let user = self.inner.user.lock().unwrap().clone();
        if credentials.email != user.email || credentials.password != PASSWORD {
            return Err(ServiceError::rejected(401, "Invalid email or password"));
        }
        Ok(LoginResponse {
            user,
            token: self.inner.token.clone(),
        })
    }

    async fn update_identity(
        &self,
        token: &str,
        patch: &ProfilePatch,
    ) -> ServiceResult<IdentityRecord> {
        self.inner.update_calls.fetch_add(1, Ordering::SeqCst);
        if token != self.inner.token {
            return Err(ServiceError::rejected(401, "Session expired"));
        }
        if self.inner.fail_updates.load(Ordering::SeqCst) {
            return Err(ServiceError::rejected(503, "Service temporarily unavailable"));
        }

        let mut user = self.inner.user.lock().unwrap();
        *user = patch.apply_to(&user);

        let mut reply = user.clone();
        if self.inner.omit_image.load(Ordering::SeqCst) {
            reply.profile_image = None;
        }
        Ok(reply)
    }
}

pub fn teacher_record(image: Option<&str>) -> IdentityRecord {
    IdentityRecord {
        id: "t-7".to_string(),
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        role: Role::Teacher,
        email: "grace@school.example".to_string(),
        profile_image: image.and_then(ImageRef::new),
    }
}

pub fn credentials() -> Credentials {
    Credentials::new("grace@school.example", PASSWORD)
}

pub fn hooks_over(
    durable: impl sm_session::KeyValueStore + 'static,
    session: &MemoryStore,
    clock: &ManualClock,
    service: &FakeIdentityService,
) -> SessionHooks<FakeIdentityService> {
    let storage = StorageTierAdapter::new(durable, session.clone());
    let policy = CacheBustPolicy::new("t", Arc::new(clock.clone()));
    SessionHooks::new(SessionOrchestrator::new(storage, policy), service.clone())
}

/// URL without its query string.
pub fn base_of(image: &ImageRef) -> &str {
    image.as_str().split('?').next().unwrap_or_default()
}

/// Value of the `t` parameter.
pub fn token_of(image: &ImageRef) -> i64 {
    image
        .as_str()
        .split(['?', '&'])
        .find_map(|pair| pair.strip_prefix("t="))
        .and_then(|t| t.parse().ok())
        .unwrap()
}
