pub mod authenticated_user;
pub mod role;

pub use authenticated_user::{AuthenticatedUser, RequestContext};
pub use role::Role;
