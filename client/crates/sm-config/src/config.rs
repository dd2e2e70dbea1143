use crate::{
    ApiConfig, CONFIG_DIR_ENV_VAR, CONFIG_FILENAME, CacheBustConfig, ConfigError,
    ConfigErrorResult, DEFAULT_CONFIG_DIR, LoggingConfig, StorageConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub cache_bust: CacheBustConfig,
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. Check for SM_CONFIG_DIR env var, else use ./.sm/
    /// 2. Auto-create config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply SM_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: SM_CONFIG_DIR env var > ./.sm/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV_VAR) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR))
    }

    /// Validate all configuration.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.storage.validate()?;
        self.cache_bust.validate()?;
        self.api.validate()?;

        if let Some(file) = &self.logging.file
            && file.trim().is_empty()
        {
            return Err(ConfigError::logging("logging.file cannot be blank"));
        }

        Ok(())
    }

    /// Absolute directory holding the storage files.
    pub fn storage_dir(&self) -> ConfigErrorResult<PathBuf> {
        Ok(Self::config_dir()?.join(&self.storage.dir))
    }

    pub fn durable_store_path(&self) -> ConfigErrorResult<PathBuf> {
        Ok(self.storage_dir()?.join(&self.storage.durable_file))
    }

    pub fn session_store_path(&self) -> ConfigErrorResult<PathBuf> {
        Ok(self.storage_dir()?.join(&self.storage.session_file))
    }

    /// Log configuration summary.
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  storage: {} (durable={}, session={})",
            self.storage.dir, self.storage.durable_file, self.storage.session_file
        );
        info!("  cache_bust: param={}", self.cache_bust.query_param);
        info!(
            "  api: {} (timeout {}s)",
            self.api.base_url, self.api.timeout_secs
        );
        info!(
            "  logging: {} (colored: {})",
            *self.logging.level, self.logging.colored
        );
    }

    fn apply_env_overrides(&mut self) {
        // Storage
        Self::apply_env_string("SM_STORAGE_DIR", &mut self.storage.dir);
        Self::apply_env_string("SM_STORAGE_DURABLE_FILE", &mut self.storage.durable_file);
        Self::apply_env_string("SM_STORAGE_SESSION_FILE", &mut self.storage.session_file);

        // Cache bust
        Self::apply_env_string("SM_CACHE_BUST_QUERY_PARAM", &mut self.cache_bust.query_param);

        // Api
        Self::apply_env_string("SM_API_BASE_URL", &mut self.api.base_url);
        Self::apply_env_parse("SM_API_TIMEOUT_SECS", &mut self.api.timeout_secs);

        // Logging
        Self::apply_env_parse("SM_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("SM_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("SM_LOG_FILE", &mut self.logging.file);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
