use crate::IdentityRecord;

use serde::Deserialize;

/// Successful login: the full identity plus its credential token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "record")]
    pub user: IdentityRecord,
    pub token: String,
}
