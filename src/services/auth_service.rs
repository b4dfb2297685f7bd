use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use super::{Authorization, ServiceError};
use crate::auth::{PasswordHasher, TokenService};
use crate::database::manager::DatabaseError;
use crate::database::models::NewUser;
use crate::database::repository::AuthRepository;

pub struct AuthService {
    repo: Arc<dyn AuthRepository>,
    hasher: PasswordHasher,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(
        repo: Arc<dyn AuthRepository>,
        hasher: PasswordHasher,
        tokens: TokenService,
    ) -> Self {
        Self { repo, hasher, tokens }
    }
}

#[async_trait]
impl Authorization for AuthService {
    async fn create_user(&self, user: NewUser) -> Result<i32, ServiceError> {
        user.validate().map_err(ServiceError::Validation)?;

        let password_hash = self.hasher.hash(&user.password);
        let id = self.repo.create_user(&user, &password_hash).await?;

        info!("registered user {} ({})", id, user.username);
        Ok(id)
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<String, ServiceError> {
        let password_hash = self.hasher.hash(password);

        let user = match self.repo.get_user(username, &password_hash).await {
            Ok(user) => user,
            Err(DatabaseError::NotFound(_)) => {
                warn!("failed sign-in for '{}'", username);
                return Err(ServiceError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        };

        Ok(self.tokens.issue(user.id)?)
    }

    fn parse_token(&self, token: &str) -> Result<i32, ServiceError> {
        Ok(self.tokens.validate(token)?)
    }
}
