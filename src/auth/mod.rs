//! Login and registration.
//!
//! `service` holds the credential checks, `handlers` the HTTP surface.

pub mod handlers;
mod service;

use actix_web::{http::Method, web};

pub use handlers::{AuthRequest, AuthResponse};
pub use service::AuthService;

/// Registers `/api/login` and `/api/register`. POST runs the handler,
/// OPTIONS answers the preflight, anything else gets a 405.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/login")
            .route(web::post().to(handlers::login))
            .route(web::method(Method::OPTIONS).to(handlers::preflight))
            .default_service(web::to(handlers::method_not_allowed)),
    )
    .service(
        web::resource("/api/register")
            .route(web::post().to(handlers::register))
            .route(web::method(Method::OPTIONS).to(handlers::preflight))
            .default_service(web::to(handlers::method_not_allowed)),
    );
}
