//! UserRepository trait implementation for SQLite

use std::sync::Arc;

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::traits::UserRepository;
use crate::data::types::{NewUser, UserRow};
use crate::domain::{LookupFilter, UsernameField};

use super::SqliteService;
use super::repositories::user;

#[async_trait]
impl UserRepository for Arc<SqliteService> {
    async fn create_user(&self, new_user: &NewUser) -> Result<UserRow, DataError> {
        user::create_user(self.pool(), new_user)
            .await
            .map_err(Into::into)
    }

    async fn get_user(&self, id: i64) -> Result<Option<UserRow>, DataError> {
        user::get_user(self.pool(), id).await.map_err(Into::into)
    }

    async fn find_users(
        &self,
        filter: &LookupFilter,
        username_field: UsernameField,
        limit: u32,
    ) -> Result<Vec<UserRow>, DataError> {
        user::find_users(self.pool(), filter, username_field, limit)
            .await
            .map_err(Into::into)
    }

    async fn list_recent_users(&self, limit: u32) -> Result<Vec<UserRow>, DataError> {
        user::list_recent(self.pool(), limit)
            .await
            .map_err(Into::into)
    }

    async fn record_login(&self, id: i64) -> Result<(), DataError> {
        user::record_login(self.pool(), id)
            .await
            .map_err(Into::into)
    }
}
