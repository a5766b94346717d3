pub mod matching_data;
pub mod user;

pub use matching_data::*;
pub use user::*;
