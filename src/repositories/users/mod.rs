//! 사용자 데이터 액세스 계층
//!
//! ```rust,ignore
//! use crate::repositories::{MongoUserRepository, UserStore};
//!
//! let users = MongoUserRepository::new(&database);
//! let user = users.find_by_email("user@example.com").await?;
//! ```

pub mod user_repo;
