use async_trait::async_trait;
use sqlx::postgres::{PgConnection, PgPoolOptions};
use sqlx::{Connection, PgPool};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::db::models::User;
use crate::db::schema::CREATE_USER_TABLE;
use crate::db::store::CredentialStore;
use crate::error::DatabaseError;

#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    /// Checks a single connection before building the pool. A refused or
    /// rejected connection is returned with the driver's message.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let conn = PgConnection::connect(&config.url)
            .await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;
        conn.close()
            .await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_lazy(&config.url)
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

        info!(max_connections = config.max_connections, "Connected to database");
        Ok(Self { pool })
    }

    /// Creates the user table when it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        sqlx::query(CREATE_USER_TABLE).execute(&self.pool).await?;
        info!("User table ready");
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_password_by_username(&self, username: &str) -> Result<Option<String>, DatabaseError> {
        let password = sqlx::query_scalar::<_, String>(
            "SELECT password FROM userBase WHERE name = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(password)
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, DatabaseError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM userBase WHERE name = $1)",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn insert_user(&self, username: &str, password: &str) -> Result<User, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO userBase (name, password)
            VALUES ($1, $2)
            RETURNING id, name, password, created_at
            "#,
        )
        .bind(username)
        .bind(password)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
