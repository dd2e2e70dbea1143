pub mod credentials;
pub mod error;
pub mod http_identity_service;
pub mod identity_service;
pub mod login_response;

pub use credentials::Credentials;
pub use error::{Result as ServiceResult, ServiceError};
pub use http_identity_service::HttpIdentityService;
pub use identity_service::IdentityService;
pub use login_response::LoginResponse;
