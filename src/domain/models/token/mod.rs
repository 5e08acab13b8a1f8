pub mod token;

pub use token::{AccessClaims, ActionClaims, TokenPurpose};
