use crate::service::ServiceResult;
use crate::{Credentials, IdentityRecord, LoginResponse, ProfilePatch};

use async_trait::async_trait;

/// Network boundary for identity operations.
///
/// Success returns the full identity as the server now holds it; failure
/// carries a message fit to show the user.
#[async_trait]
pub trait IdentityService: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> ServiceResult<LoginResponse>;

    async fn update_identity(
        &self,
        token: &str,
        patch: &ProfilePatch,
    ) -> ServiceResult<IdentityRecord>;
}
