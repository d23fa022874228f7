//! SQLite repositories
//!
//! Types (UserRow, NewUser) should be imported from `crate::data::types`.

pub mod user;

pub use user::{UNUSABLE_PASSWORD_PREFIX, create_user, find_users, get_user, list_recent, record_login};
