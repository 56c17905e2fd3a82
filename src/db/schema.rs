//! DDL issued once at startup, before the server accepts requests.

/// User table:
/// - `id` SERIAL PRIMARY KEY
/// - `name` unique login name
/// - `password` stored as supplied
/// - `created_at` defaults to insertion time
///
/// The table name is unquoted, so PostgreSQL folds it to `userbase`.
pub const CREATE_USER_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS userBase (
    id SERIAL PRIMARY KEY,
    name VARCHAR(100) UNIQUE NOT NULL,
    password VARCHAR(100) NOT NULL,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)
"#;
