use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use tokio::sync::RwLock;

use crate::db::models::User;
use crate::db::store::CredentialStore;
use crate::error::DatabaseError;

/// Credential store kept in process memory.
///
/// Rows are keyed by username, so uniqueness holds under concurrent
/// inserts just like the UNIQUE constraint on the PostgreSQL table.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    users: RwLock<HashMap<String, User>>,
    next_id: AtomicI32,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_password_by_username(&self, username: &str) -> Result<Option<String>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users.get(username).map(|user| user.password.clone()))
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, DatabaseError> {
        Ok(self.users.read().await.contains_key(username))
    }

    async fn insert_user(&self, username: &str, password: &str) -> Result<User, DatabaseError> {
        let mut users = self.users.write().await;
        if users.contains_key(username) {
            return Err(DatabaseError::Duplicate);
        }

        // SERIAL starts at 1
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let user = User::new(id, username.to_string(), password.to_string());
        users.insert(username.to_string(), user.clone());
        Ok(user)
    }
}
