use crate::{ConfigError, ConfigErrorResult, DEFAULT_QUERY_PARAM};

use serde::Deserialize;

pub const MAX_QUERY_PARAM_LENGTH: usize = 32;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheBustConfig {
    /// Query parameter carrying the freshness token on image URLs
    pub query_param: String,
}

impl Default for CacheBustConfig {
    fn default() -> Self {
        Self {
            query_param: String::from(DEFAULT_QUERY_PARAM),
        }
    }
}

impl CacheBustConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.query_param.is_empty() || self.query_param.len() > MAX_QUERY_PARAM_LENGTH {
            return Err(ConfigError::cache_bust(format!(
                "cache_bust.query_param must be 1-{} characters, got {}",
                MAX_QUERY_PARAM_LENGTH,
                self.query_param.len()
            )));
        }

        let url_safe = self
            .query_param
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !url_safe {
            return Err(ConfigError::cache_bust(format!(
                "cache_bust.query_param must only contain [A-Za-z0-9_-], got '{}'",
                self.query_param
            )));
        }

        Ok(())
    }
}
