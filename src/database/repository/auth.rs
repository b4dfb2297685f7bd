use async_trait::async_trait;
use sqlx::PgPool;

use super::AuthRepository;
use crate::database::manager::DatabaseError;
use crate::database::models::{NewUser, User};

const INSERT_USER: &str =
    "INSERT INTO users (name, username, password_hash) VALUES ($1, $2, $3) RETURNING id";

const SELECT_USER: &str =
    "SELECT id, name, username FROM users WHERE username = $1 AND password_hash = $2";

pub struct AuthPostgres {
    pool: PgPool,
}

impl AuthPostgres {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthRepository for AuthPostgres {
    async fn create_user(&self, user: &NewUser, password_hash: &str) -> Result<i32, DatabaseError> {
        sqlx::query_scalar::<_, i32>(INSERT_USER)
            .bind(&user.name)
            .bind(&user.username)
            .bind(password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    let message = format!("username '{}' is already taken", user.username);
                    DatabaseError::Conflict(message)
                }
                other => DatabaseError::Sqlx(other),
            })
    }

    async fn get_user(&self, username: &str, password_hash: &str) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>(SELECT_USER)
            .bind(username)
            .bind(password_hash)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("user not found".to_string()))
    }
}
