use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_DURABLE_FILENAME, DEFAULT_SESSION_FILENAME,
    DEFAULT_STORAGE_DIR,
};

use std::path::Path;

use serde::Deserialize;

/// Where the file-backed durable and session stores live.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory relative to the config dir
    pub dir: String,
    /// Store that survives a browser restart
    pub durable_file: String,
    /// Store that is cleared when the browser session ends
    pub session_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: String::from(DEFAULT_STORAGE_DIR),
            durable_file: String::from(DEFAULT_DURABLE_FILENAME),
            session_file: String::from(DEFAULT_SESSION_FILENAME),
        }
    }
}

impl StorageConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        let dir = Path::new(&self.dir);
        if dir.is_absolute() || self.dir.contains("..") {
            return Err(ConfigError::storage(
                "storage.dir must be relative and cannot contain '..'",
            ));
        }

        for (name, value) in [
            ("storage.durable_file", &self.durable_file),
            ("storage.session_file", &self.session_file),
        ] {
            if value.is_empty() || value.contains('/') || value.contains('\\') {
                return Err(ConfigError::storage(format!(
                    "{name} must be a plain file name, got '{value}'"
                )));
            }
        }

        if self.durable_file == self.session_file {
            return Err(ConfigError::storage(
                "storage.durable_file and storage.session_file must differ",
            ));
        }

        Ok(())
    }
}
