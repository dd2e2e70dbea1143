mod api_config;
mod cache_bust_config;
mod config;
mod error;
mod log_level;
mod logging_config;
mod storage_config;

#[cfg(test)]
mod tests;

pub use api_config::ApiConfig;
pub use cache_bust_config::CacheBustConfig;
pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use storage_config::StorageConfig;

const DEFAULT_CONFIG_DIR: &str = ".sm";
const CONFIG_FILENAME: &str = "config.toml";
const CONFIG_DIR_ENV_VAR: &str = "SM_CONFIG_DIR";

const DEFAULT_STORAGE_DIR: &str = "storage";
const DEFAULT_DURABLE_FILENAME: &str = "durable.json";
const DEFAULT_SESSION_FILENAME: &str = "session.json";

const DEFAULT_QUERY_PARAM: &str = "t";

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_API_TIMEOUT_SECS: u64 = 15;

const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_COLORED: bool = true;
