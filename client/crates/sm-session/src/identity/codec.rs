//! Single decode boundary for stored identity records.

use crate::identity::{IdentityRecord, ImageRef};
use crate::{Result as SessionResult, SessionError};

pub fn encode(record: &IdentityRecord) -> SessionResult<String> {
    Ok(serde_json::to_string(record)?)
}

/// Corrupt input yields `CorruptRecord`; callers treat it as "no stored identity".
pub fn decode(raw: &str) -> SessionResult<IdentityRecord> {
    serde_json::from_str(raw).map_err(|e| SessionError::corrupt_record(e.to_string()))
}

pub fn extract_image(record: &IdentityRecord) -> Option<&ImageRef> {
    record.profile_image.as_ref()
}

/// Replaces the image when one is given; `None` keeps the prior image.
pub fn merge_image(record: IdentityRecord, image: Option<ImageRef>) -> IdentityRecord {
    match image {
        Some(image) => IdentityRecord {
            profile_image: Some(image),
            ..record
        },
        None => record,
    }
}
