pub mod auth_service;
pub mod matching_service;
pub mod user_service;

pub use matching_service::*;
pub use user_service::*;
