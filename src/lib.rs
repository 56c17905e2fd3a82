pub mod auth;
pub mod config;
pub mod db;
pub mod error;

use std::sync::Arc;
use actix_web::{http::header, middleware::DefaultHeaders, web, HttpResponse};
use tracing::info;

pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
pub use config::Settings;

pub use auth::AuthService;
pub use db::{CredentialStore, MemoryCredentialStore, PgCredentialStore, User};

/// Health check endpoint handler
/// Returns a JSON response with server status and timestamp
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Permissive CORS headers attached to every response.
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .add((header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"))
        .add((header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"))
}

/// All routes served by the application.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .configure(auth::configure);
}

/// Application state shared across all workers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CredentialStore>,
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    /// Connects to PostgreSQL and makes sure the user table exists.
    pub async fn new(config: &Settings) -> Result<Self> {
        let store = PgCredentialStore::connect(&config.database).await?;
        store.ensure_schema().await?;

        Ok(Self::with_store(Arc::new(store)))
    }

    pub fn with_store(store: Arc<dyn CredentialStore>) -> Self {
        Self {
            auth_service: Arc::new(AuthService::new(store.clone())),
            store,
        }
    }

    pub async fn shutdown(&self) {
        self.store.close().await;
        info!("Credential store closed");
    }
}
