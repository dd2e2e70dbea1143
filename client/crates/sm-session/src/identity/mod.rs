pub mod codec;
pub mod identity_record;
pub mod image_ref;
pub mod profile_patch;
pub mod role;

pub use identity_record::IdentityRecord;
pub use image_ref::ImageRef;
pub use profile_patch::ProfilePatch;
pub use role::Role;
