//! User Records Module
//! Mission: Store and serve user records behind the token guard

pub mod api;
pub mod models;
pub mod user_store;

pub use api::UsersState;
pub use models::{User, UserResponse, UserStatus};
pub use user_store::UserStore;
