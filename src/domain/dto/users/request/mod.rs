pub mod auth_request;
pub mod profile_request;
pub mod validators;

pub use auth_request::*;
pub use profile_request::UpdateProfileRequest;
