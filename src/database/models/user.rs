use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::check_len;

/// Stored account, as seen by callers. The password digest never leaves the
/// `users` table, so it has no field here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub username: String,
}

/// Registration input carrying the plaintext password
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub password: String,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name is required".to_string());
        }
        if self.username.trim().is_empty() {
            return Err("username is required".to_string());
        }
        if self.password.is_empty() {
            return Err("password is required".to_string());
        }
        check_len("name", &self.name)?;
        check_len("username", &self.username)
    }
}

/// Sign-in input
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}
