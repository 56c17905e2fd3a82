use thiserror::Error;
use actix_web::{ResponseError, HttpResponse, http::StatusCode};

use crate::auth::AuthResponse;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    AuthError(#[from] AuthError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),
}

// Failures are reported in the body; only non-auth errors change the status.
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::AuthError(e) => AuthResponse::failure(e),
            AppError::DatabaseError(_) => AuthResponse {
                success: false,
                message: "Internal server error".to_string(),
            },
        };
        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::AuthError(_) => StatusCode::OK,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Logical outcomes of the login and register flows that end in
/// `success: false`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Malformed request body")]
    MalformedRequest,

    #[error("User not found")]
    UserNotFound,

    #[error("Wrong password")]
    WrongPassword,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Failed to create user")]
    CreateFailed,
}

impl AuthError {
    /// Message sent to the client for this outcome.
    pub fn client_message(&self) -> &'static str {
        match self {
            AuthError::MalformedRequest => "Неверный формат данных",
            AuthError::UserNotFound => "Пользователь не найден",
            AuthError::WrongPassword => "Неверный пароль",
            AuthError::UserAlreadyExists => "Пользователь уже существует",
            AuthError::CreateFailed => "Ошибка создания пользователя",
        }
    }
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Duplicate record")]
    Duplicate,
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                DatabaseError::Duplicate
            }
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => DatabaseError::ConnectionError(err.to_string()),
            _ => DatabaseError::QueryError(err.to_string()),
        }
    }
}
