use std::panic::Location;
use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Config error: {0}")]
    Config(#[from] sm_config::ConfigError),

    #[error("Identity service error: {0}")]
    Service(#[from] sm_session::ServiceError),

    #[error("Failed to open log file {path}: {source} {location}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Failed to initialize logger: {message} {location}")]
    Logger {
        message: String,
        location: ErrorLocation,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] sm_session::StorageError),

    #[error("JSON output error: {source} {location}")]
    Json {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },
}

impl CliError {
    #[track_caller]
    pub fn log_file(path: PathBuf, source: std::io::Error) -> Self {
        Self::LogFile {
            path,
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn logger(message: impl Into<String>) -> Self {
        Self::Logger {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for CliError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        Self::Json {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
