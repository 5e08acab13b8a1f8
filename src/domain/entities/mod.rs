//! 영속 엔티티

pub mod users;
pub mod tokens;

pub use users::*;
pub use tokens::*;
