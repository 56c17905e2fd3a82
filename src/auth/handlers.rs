use actix_web::{dev::Payload, web, FromRequest, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use tracing::{info, warn};

use crate::error::{AppError, AuthError};
use crate::AppState;

const LOGIN_SUCCESS: &str = "Успешный вход";
const REGISTER_SUCCESS: &str = "Регистрация успешна";

/// Body of both `/api/login` and `/api/register`.
///
/// Decoding is lenient: keys match case-insensitively, missing or `null`
/// fields stay empty, unknown keys are ignored and anything after the first
/// JSON value is not read. Any `Content-Type` is accepted.
#[derive(Default)]
pub struct AuthRequest {
    pub username: String,
    pub password: String,
}

impl AuthRequest {
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        let mut values = serde_json::Deserializer::from_slice(body).into_iter::<Value>();
        let value = match values.next() {
            Some(value) => value?,
            None => return Err(serde::de::Error::custom("empty request body")),
        };

        let mut request = AuthRequest::default();
        match value {
            Value::Null => {}
            Value::Object(fields) => {
                for (key, field) in fields {
                    let target = if key.eq_ignore_ascii_case("username") {
                        &mut request.username
                    } else if key.eq_ignore_ascii_case("password") {
                        &mut request.password
                    } else {
                        continue;
                    };

                    match field {
                        Value::String(text) => *target = text,
                        Value::Null => {}
                        other => {
                            return Err(serde::de::Error::custom(format!(
                                "field {} must be a string, got {}",
                                key, other
                            )))
                        }
                    }
                }
            }
            other => {
                return Err(serde::de::Error::custom(format!(
                    "expected a JSON object, got {}",
                    other
                )))
            }
        }

        Ok(request)
    }
}

impl FromRequest for AuthRequest {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let body = web::Bytes::from_request(req, payload);
        let path = req.path().to_string();

        Box::pin(async move {
            let body = body.await.map_err(|e| {
                warn!(path = %path, error = %e, "Failed to read request body");
                AuthError::MalformedRequest
            })?;

            AuthRequest::from_slice(&body).map_err(|e| {
                warn!(path = %path, error = %e, "Rejected malformed request body");
                AppError::from(AuthError::MalformedRequest)
            })
        })
    }
}

impl fmt::Debug for AuthRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
}

impl AuthResponse {
    pub fn success(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }

    pub fn failure(err: &AuthError) -> Self {
        Self {
            success: false,
            message: err.client_message().to_string(),
        }
    }
}

pub async fn login(
    req: AuthRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received login request for username: {}", req.username);
    match state.auth_service.authenticate(&req.username, &req.password).await {
        Ok(()) => {
            info!("Login successful for username: {}", req.username);
            Ok(HttpResponse::Ok().json(AuthResponse::success(LOGIN_SUCCESS)))
        }
        Err(e) => {
            warn!("Login failed for username: {}: {}", req.username, e);
            Err(e.into())
        }
    }
}

pub async fn register(
    req: AuthRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received registration request for username: {}", req.username);
    match state.auth_service.register(&req.username, &req.password).await {
        Ok(_) => {
            info!("Registration successful for username: {}", req.username);
            Ok(HttpResponse::Ok().json(AuthResponse::success(REGISTER_SUCCESS)))
        }
        Err(e) => {
            warn!("Registration failed for username: {}: {}", req.username, e);
            Err(e.into())
        }
    }
}

/// CORS preflight. The headers themselves come from the app-wide middleware.
pub async fn preflight() -> HttpResponse {
    HttpResponse::Ok().finish()
}

pub async fn method_not_allowed(req: HttpRequest) -> HttpResponse {
    warn!(method = %req.method(), path = %req.path(), "Method not allowed");
    HttpResponse::MethodNotAllowed()
        .content_type("text/plain; charset=utf-8")
        .body("Method not allowed\n")
}
