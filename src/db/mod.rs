//! Credential storage for the login and register endpoints.
//!
//! `CredentialStore` is the seam the HTTP layer talks to. `PgCredentialStore`
//! is the production backend, `MemoryCredentialStore` keeps rows in process.

pub mod memory;
pub mod models;
pub mod postgres;
pub mod schema;
pub mod store;

pub use memory::MemoryCredentialStore;
pub use models::User;
pub use postgres::PgCredentialStore;
pub use store::CredentialStore;
