//! Well-known storage keys.

/// Encoded identity record (durable)
pub const USER: &str = "user";
/// Credential token (durable when remembered, session otherwise)
pub const TOKEN: &str = "token";
/// Raw profile image reference, stored apart from the record (durable)
pub const PROFILE_IMAGE: &str = "profileImage";
/// Cache-bust token (durable, session and memory)
pub const PROFILE_IMAGE_TIMESTAMP: &str = "profileImageTimestamp";
/// Remember-me preference (durable, survives logout)
pub const REMEMBER_ME: &str = "rememberMe";
/// Raw profile image reference cached for this browser session
pub const CACHED_PROFILE_IMAGE: &str = "cachedProfileImage";
/// Base image URL the current cache-bust token was minted for
pub const IMAGE_CACHE_KEY: &str = "imageCacheKey";

/// Durable keys removed at logout. `rememberMe` is not one of them.
pub const DURABLE_SESSION_KEYS: [&str; 4] = [USER, TOKEN, PROFILE_IMAGE, PROFILE_IMAGE_TIMESTAMP];

/// Session keys removed at logout.
pub const SESSION_SESSION_KEYS: [&str; 4] = [
    TOKEN,
    CACHED_PROFILE_IMAGE,
    PROFILE_IMAGE_TIMESTAMP,
    IMAGE_CACHE_KEY,
];

/// Memory keys removed at logout.
pub const MEMORY_SESSION_KEYS: [&str; 2] = [PROFILE_IMAGE_TIMESTAMP, IMAGE_CACHE_KEY];
