use crate::{Credentials, ProfilePatch};

/// What the UI asks the session layer to do.
#[derive(Debug, Clone)]
pub enum SessionIntent {
    Login {
        credentials: Credentials,
        remember_me: bool,
    },
    Logout,
    UpdateProfile(ProfilePatch),
    ForceRefreshImage,
}
