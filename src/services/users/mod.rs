pub mod user_service;
pub mod avatar_store;

pub use user_service::UserService;
pub use avatar_store::{AvatarStore, AvatarUpload, CloudinaryAvatarStore};
