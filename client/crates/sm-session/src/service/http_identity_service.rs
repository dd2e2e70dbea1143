use crate::service::{ServiceError, ServiceResult};
use crate::{Credentials, IdentityRecord, IdentityService, LoginResponse, ProfilePatch};

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client as ReqwestClient, Method, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

const LOGIN_PATH: &str = "/api/auth/login";
const CURRENT_USER_PATH: &str = "/api/users/me";

/// `IdentityService` over the school REST backend.
pub struct HttpIdentityService {
    base_url: String,
    client: ReqwestClient,
}

/// Update responses come either bare or wrapped in `{ "user": ... }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum UserEnvelope {
    Wrapped { user: IdentityRecord },
    Bare(IdentityRecord),
}

impl From<UserEnvelope> for IdentityRecord {
    fn from(envelope: UserEnvelope) -> Self {
        match envelope {
            UserEnvelope::Wrapped { user } => user,
            UserEnvelope::Bare(user) => user,
        }
    }
}

impl HttpIdentityService {
    /// # Arguments
    /// * `base_url` - Server URL (e.g., "http://127.0.0.1:5000")
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: ReqwestClient::new(),
        }
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> ServiceResult<Self> {
        let client = ReqwestClient::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, &url)
    }

    /// Parses a success body, or turns an error body into a readable rejection.
    async fn parse<T: DeserializeOwned>(response: Response) -> ServiceResult<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });
            debug!("Identity service rejected request: {status} {message}");
            return Err(ServiceError::rejected(status.as_u16(), message));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Pulls `message` or `error.message` out of an error body.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("error").and_then(|e| e.get("message")))
        .or_else(|| value.get("error").filter(|e| e.is_string()))
        .and_then(|m| m.as_str())
        .map(String::from)
}

#[async_trait]
impl IdentityService for HttpIdentityService {
    async fn login(&self, credentials: &Credentials) -> ServiceResult<LoginResponse> {
        let response = self
            .request(Method::POST, LOGIN_PATH)
            .json(credentials)
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn update_identity(
        &self,
        token: &str,
        patch: &ProfilePatch,
    ) -> ServiceResult<IdentityRecord> {
        let response = self
            .request(Method::PUT, CURRENT_USER_PATH)
            .bearer_auth(token)
            .json(patch)
            .send()
            .await?;
        let envelope: UserEnvelope = Self::parse(response).await?;
        Ok(envelope.into())
    }
}
