use std::fmt;

use serde::{Deserialize, Serialize};

const DATA_URI_SCHEME: &str = "data:";

/// Profile image reference: either a self-contained data URI or a URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    /// Returns `None` for blank input.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    /// Data URIs embed the image bytes and are never fetched over the network.
    pub fn is_data_uri(&self) -> bool {
        is_data_uri(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub(crate) fn is_data_uri(value: &str) -> bool {
    value
        .trim_start()
        .get(..DATA_URI_SCHEME.len())
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case(DATA_URI_SCHEME))
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
