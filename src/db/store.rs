use async_trait::async_trait;

use crate::db::models::User;
use crate::error::DatabaseError;

/// Persistent storage of username/password pairs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Stored password for `username`, or `None` when no row exists.
    async fn find_password_by_username(&self, username: &str) -> Result<Option<String>, DatabaseError>;

    async fn exists_by_username(&self, username: &str) -> Result<bool, DatabaseError>;

    /// Inserts a new row. A taken username yields `DatabaseError::Duplicate`.
    async fn insert_user(&self, username: &str, password: &str) -> Result<User, DatabaseError>;

    async fn close(&self) {}
}
