use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::{error, info, warn};

use crate::db::{CredentialStore, User};
use crate::error::{AuthError, DatabaseError};

pub struct AuthService {
    store: Arc<dyn CredentialStore>,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Checks `password` against the stored password for `username`.
    ///
    /// A failed lookup is reported as an unknown user.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let stored = match self.store.find_password_by_username(username).await {
            Ok(Some(stored)) => stored,
            Ok(None) => return Err(AuthError::UserNotFound),
            Err(e) => {
                error!(username, error = %e, "Credential lookup failed");
                return Err(AuthError::UserNotFound);
            }
        };

        if !passwords_match(&stored, password) {
            return Err(AuthError::WrongPassword);
        }

        Ok(())
    }

    /// Creates a user unless the username is already taken.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, AuthError> {
        match self.store.exists_by_username(username).await {
            Ok(true) => return Err(AuthError::UserAlreadyExists),
            Ok(false) => {}
            Err(e) => {
                warn!(username, error = %e, "Existence check failed, attempting insert");
            }
        }

        match self.store.insert_user(username, password).await {
            Ok(user) => {
                info!(username, id = user.id, "User created");
                Ok(user)
            }
            // Lost a race with a concurrent registration
            Err(DatabaseError::Duplicate) => Err(AuthError::UserAlreadyExists),
            Err(e) => {
                error!(username, error = %e, "Failed to insert user");
                Err(AuthError::CreateFailed)
            }
        }
    }
}

fn passwords_match(stored: &str, supplied: &str) -> bool {
    stored.as_bytes().ct_eq(supplied.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::MockCredentialStore;
    use crate::db::MemoryCredentialStore;

    fn memory_service() -> AuthService {
        AuthService::new(Arc::new(MemoryCredentialStore::new()))
    }

    #[test]
    fn test_passwords_match() {
        assert!(passwords_match("pw1", "pw1"));
        assert!(passwords_match("", ""));
        assert!(!passwords_match("pw1", "pw2"));
        assert!(!passwords_match("pw1", "pw1 "));
        assert!(!passwords_match("Pw1", "pw1"));
    }

    #[test_log::test(tokio::test)]
    async fn test_register_then_authenticate() {
        let service = memory_service();
        let user = service.register("alice", "pw1").await.unwrap();
        assert_eq!(user.username, "alice");

        assert!(service.authenticate("alice", "pw1").await.is_ok());
        assert_eq!(
            service.authenticate("alice", "wrong").await,
            Err(AuthError::WrongPassword)
        );
    }

    #[test_log::test(tokio::test)]
    async fn test_authenticate_unknown_user() {
        let service = memory_service();
        assert_eq!(
            service.authenticate("nobody", "pw").await,
            Err(AuthError::UserNotFound)
        );
    }

    #[test_log::test(tokio::test)]
    async fn test_register_duplicate() {
        let service = memory_service();
        service.register("alice", "pw1").await.unwrap();
        assert_eq!(
            service.register("alice", "pw2").await.unwrap_err(),
            AuthError::UserAlreadyExists
        );
        // First password still wins
        assert!(service.authenticate("alice", "pw1").await.is_ok());
    }

    #[test_log::test(tokio::test)]
    async fn test_empty_credentials_are_accepted() {
        let service = memory_service();
        service.register("", "").await.unwrap();
        assert!(service.authenticate("", "").await.is_ok());
    }

    #[test_log::test(tokio::test)]
    async fn test_lookup_failure_reports_user_not_found() {
        let mut store = MockCredentialStore::new();
        store
            .expect_find_password_by_username()
            .times(1)
            .returning(|_| Err(DatabaseError::ConnectionError("connection reset".into())));

        let service = AuthService::new(Arc::new(store));
        assert_eq!(
            service.authenticate("alice", "pw1").await,
            Err(AuthError::UserNotFound)
        );
    }

    #[test_log::test(tokio::test)]
    async fn test_insert_conflict_reports_already_exists() {
        let mut store = MockCredentialStore::new();
        store
            .expect_exists_by_username()
            .times(1)
            .returning(|_| Ok(false));
        store
            .expect_insert_user()
            .times(1)
            .returning(|_, _| Err(DatabaseError::Duplicate));

        let service = AuthService::new(Arc::new(store));
        assert_eq!(
            service.register("alice", "pw1").await.unwrap_err(),
            AuthError::UserAlreadyExists
        );
    }

    #[test_log::test(tokio::test)]
    async fn test_insert_failure_reports_create_failed() {
        let mut store = MockCredentialStore::new();
        store
            .expect_exists_by_username()
            .times(1)
            .returning(|_| Ok(false));
        store
            .expect_insert_user()
            .times(1)
            .returning(|_, _| Err(DatabaseError::QueryError("value too long".into())));

        let service = AuthService::new(Arc::new(store));
        assert_eq!(
            service.register("alice", "pw1").await.unwrap_err(),
            AuthError::CreateFailed
        );
    }

    #[test_log::test(tokio::test)]
    async fn test_existence_check_failure_still_inserts() {
        let mut store = MockCredentialStore::new();
        store
            .expect_exists_by_username()
            .times(1)
            .returning(|_| Err(DatabaseError::QueryError("statement timeout".into())));
        store
            .expect_insert_user()
            .withf(|username, password| username == "alice" && password == "pw1")
            .times(1)
            .returning(|username, password| {
                Ok(User::new(1, username.to_string(), password.to_string()))
            });

        let service = AuthService::new(Arc::new(store));
        let user = service.register("alice", "pw1").await.unwrap();
        assert_eq!(user.id, 1);
    }

    #[test_log::test(tokio::test)]
    async fn test_existing_user_skips_insert() {
        let mut store = MockCredentialStore::new();
        store
            .expect_exists_by_username()
            .times(1)
            .returning(|_| Ok(true));
        store.expect_insert_user().never();

        let service = AuthService::new(Arc::new(store));
        assert_eq!(
            service.register("alice", "pw1").await.unwrap_err(),
            AuthError::UserAlreadyExists
        );
    }
}
