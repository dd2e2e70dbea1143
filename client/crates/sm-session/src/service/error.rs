use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

/// Errors from the identity service
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("HTTP request error: {message} {location}")]
    Http {
        message: String,
        location: ErrorLocation,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request rejected ({status}): {message} {location}")]
    Rejected {
        status: u16,
        message: String,
        location: ErrorLocation,
    },

    #[error("JSON parse error: {message} {location}")]
    Json {
        message: String,
        location: ErrorLocation,
        #[source]
        source: serde_json::Error,
    },
}

impl ServiceError {
    #[track_caller]
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        ServiceError::Http {
            message: err.to_string(),
            location: ErrorLocation::from(Location::caller()),
            source: err,
        }
    }

    #[track_caller]
    pub fn from_json(err: serde_json::Error) -> Self {
        ServiceError::Json {
            message: err.to_string(),
            location: ErrorLocation::from(Location::caller()),
            source: err,
        }
    }

    #[track_caller]
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        ServiceError::Rejected {
            status,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Message suitable for display, without source locations.
    pub fn user_message(&self) -> String {
        match self {
            Self::Http { .. } => "Unable to reach the server. Please try again.".to_string(),
            Self::Rejected { message, .. } => message.clone(),
            Self::Json { .. } => "The server sent an unexpected response.".to_string(),
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        ServiceError::from_reqwest(err)
    }
}

impl From<serde_json::Error> for ServiceError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        ServiceError::from_json(err)
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
