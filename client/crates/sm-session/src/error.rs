use crate::ServiceError;
use crate::storage::StorageTier;

use std::panic::Location;
use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

/// Failures raised by a single key-value store.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage quota exceeded writing '{key}': needs {needed} bytes, {available} available {location}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        available: usize,
        location: ErrorLocation,
    },

    #[error("Storage is disabled {location}")]
    Disabled { location: ErrorLocation },

    #[error("Storage IO failed at {path}: {source} {location}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Failed to serialize store contents: {source} {location}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },

    #[error("Storage lock poisoned {location}")]
    Poisoned { location: ErrorLocation },
}

impl StorageError {
    #[track_caller]
    pub fn quota_exceeded(key: impl Into<String>, needed: usize, available: usize) -> Self {
        Self::QuotaExceeded {
            key: key.into(),
            needed,
            available,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn disabled() -> Self {
        Self::Disabled {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn io(path: PathBuf, source: std::io::Error) -> Self {
        Self::Io {
            path,
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn poisoned() -> Self {
        Self::Poisoned {
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        Self::Serialization {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Errors surfaced by the session layer.
///
/// None of these are fatal: storage problems degrade to in-memory operation
/// and network problems roll back optimistic state.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("{tier} storage unavailable for '{key}': {source} {location}")]
    StorageUnavailable {
        tier: StorageTier,
        key: String,
        #[source]
        source: StorageError,
        location: ErrorLocation,
    },

    #[error("Stored identity record is corrupt: {message} {location}")]
    CorruptRecord {
        message: String,
        location: ErrorLocation,
    },

    #[error("Failed to serialize identity: {source} {location}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },

    #[error("No signed-in identity {location}")]
    NotAuthenticated { location: ErrorLocation },

    #[error("Identity service failed: {message} {location}")]
    Network {
        message: String,
        #[source]
        source: ServiceError,
        location: ErrorLocation,
    },
}

impl SessionError {
    /// Whether this error is recoverable via retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::StorageUnavailable { .. } | Self::Network { .. })
    }

    /// User-friendly recovery hint.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            Self::StorageUnavailable { .. } => {
                "Your changes are active but could not be saved in this browser. \
                   Check storage settings or free up space."
            }
            Self::CorruptRecord { .. } => {
                "Saved sign-in data was unreadable and has been cleared. \
                   Please sign in again."
            }
            Self::Serialization { .. } => {
                "Internal error preparing identity data. \
                   Please report this issue."
            }
            Self::NotAuthenticated { .. } => "Please sign in first.",
            Self::Network { .. } => {
                "Unable to reach the school server. \
                   Check your connection and try again."
            }
        }
    }

    #[track_caller]
    pub fn storage_unavailable(tier: StorageTier, key: impl Into<String>, source: StorageError) -> Self {
        Self::StorageUnavailable {
            tier,
            key: key.into(),
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn corrupt_record(message: impl Into<String>) -> Self {
        Self::CorruptRecord {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn not_authenticated() -> Self {
        Self::NotAuthenticated {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn network(source: ServiceError) -> Self {
        Self::Network {
            message: source.user_message(),
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Text shown to the user: the server's own message when it sent one,
    /// otherwise the recovery hint.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network { message, .. } => message.clone(),
            _ => self.recovery_hint().to_string(),
        }
    }
}

impl From<ServiceError> for SessionError {
    #[track_caller]
    fn from(source: ServiceError) -> Self {
        Self::network(source)
    }
}

impl From<serde_json::Error> for SessionError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        Self::Serialization {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
