use crate::identity::{IdentityRecord, ImageRef, codec};

use serde::{Deserialize, Serialize};

/// Partial update of the identity. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<ImageRef>,
}

impl ProfilePatch {
    /// Image-only update, as produced by a file upload.
    pub fn image(image: ImageRef) -> Self {
        Self {
            profile_image: Some(image),
            ..Default::default()
        }
    }

    pub fn touches_image(&self) -> bool {
        self.profile_image.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.profile_image.is_none()
    }

    pub fn apply_to(&self, record: &IdentityRecord) -> IdentityRecord {
        let mut next = record.clone();
        if let Some(first_name) = &self.first_name {
            next.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            next.last_name = last_name.clone();
        }
        if let Some(email) = &self.email {
            next.email = email.clone();
        }
        codec::merge_image(next, self.profile_image.clone())
    }
}
