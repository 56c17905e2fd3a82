use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;
use std::fmt;

#[derive(Clone, Serialize, FromRow)]
pub struct User {
    pub id: i32,
    #[sqlx(rename = "name")]
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub created_at: Option<NaiveDateTime>,
}

impl User {
    pub fn new(id: i32, username: String, password: String) -> Self {
        Self {
            id,
            username,
            password,
            created_at: Some(chrono::Utc::now().naive_utc()),
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}
