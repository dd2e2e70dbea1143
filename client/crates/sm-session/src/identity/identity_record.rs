use crate::identity::{ImageRef, Role};

use serde::{Deserialize, Deserializer, Serialize};

/// The signed-in principal as held on the client.
///
/// `role` is required; a stored record without one does not decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRecord {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: Role,
    #[serde(default)]
    pub email: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_image"
    )]
    pub profile_image: Option<ImageRef>,
}

/// Null and blank strings both mean "no image".
fn deserialize_image<'de, D>(deserializer: D) -> Result<Option<ImageRef>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(ImageRef::new))
}
