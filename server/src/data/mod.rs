//! Data storage layer
//!
//! - `sqlite` - Embedded user store
//! - `types` - User row types shared by repositories and the API
//! - `traits` - Repository seam so hosts can swap the user store
//! - `error` - Unified error type for the data layer

pub mod error;
pub mod sqlite;
pub mod traits;
pub mod types;

pub use sqlite::SqliteService;

pub use error::DataError;
pub use traits::UserRepository;
pub use types::{NewUser, UserRow};

use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::core::storage::AppStorage;

/// User directory service
///
/// Owns the SQLite service backing the user table and hands out the
/// repository used by the panel and the CLI.
#[derive(Clone)]
pub struct UserDirectory {
    sqlite: Arc<SqliteService>,
}

impl UserDirectory {
    /// Open the user store under the application data directory
    pub async fn init(storage: &AppStorage) -> Result<Self, DataError> {
        let service = SqliteService::init(storage).await?;
        Ok(Self {
            sqlite: Arc::new(service),
        })
    }

    /// In-memory user store for tests
    #[cfg(test)]
    pub async fn in_memory() -> Self {
        let service = SqliteService::open_in_memory()
            .await
            .expect("in-memory sqlite");
        Self {
            sqlite: Arc::new(service),
        }
    }

    /// Repository handle for user operations
    pub fn repository(&self) -> Arc<dyn UserRepository> {
        Arc::new(Arc::clone(&self.sqlite))
    }

    /// Run a WAL checkpoint
    pub async fn checkpoint(&self) -> Result<(), DataError> {
        self.sqlite.checkpoint().await.map_err(Into::into)
    }

    /// Close the database connection gracefully
    pub async fn close(&self) {
        self.sqlite.close().await;
    }

    /// Start the background checkpoint task
    pub fn start_checkpoint_task(&self, shutdown_rx: watch::Receiver<bool>) -> JoinHandle<()> {
        self.sqlite.start_checkpoint_task(shutdown_rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_repository_shares_pool() {
        let directory = UserDirectory::in_memory().await;
        let repo = directory.repository();

        let created = repo
            .create_user(&NewUser {
                username: Some("alice".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        // A second handle sees the same rows
        let other = directory.repository();
        let fetched = other.get_user(created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn test_checkpoint_on_memory_database() {
        let directory = UserDirectory::in_memory().await;
        directory.checkpoint().await.unwrap();
        directory.close().await;
    }
}
