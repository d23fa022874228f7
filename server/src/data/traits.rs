//! Repository traits for database backends
//!
//! The user directory is reached only through [`UserRepository`], so hosts can
//! plug in their own user store.

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::types::{NewUser, UserRow};
use crate::domain::{LookupFilter, UsernameField};

/// Repository trait for user records
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user with an unusable password
    async fn create_user(&self, user: &NewUser) -> Result<UserRow, DataError>;

    /// Get a user by primary key
    async fn get_user(&self, id: i64) -> Result<Option<UserRow>, DataError>;

    /// Find users matching a lookup filter, at most `limit` rows.
    ///
    /// `LookupFilter::Username` is matched against `username_field`.
    async fn find_users(
        &self,
        filter: &LookupFilter,
        username_field: UsernameField,
        limit: u32,
    ) -> Result<Vec<UserRow>, DataError>;

    /// Most recently active users, `last_login` descending, never-logged-in last
    async fn list_recent_users(&self, limit: u32) -> Result<Vec<UserRow>, DataError>;

    /// Stamp `last_login` with the current time
    async fn record_login(&self, id: i64) -> Result<(), DataError>;
}
