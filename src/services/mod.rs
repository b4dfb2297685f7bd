pub mod auth_service;
pub mod todo_item_service;
pub mod todo_list_service;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::auth::{PasswordHasher, TokenError, TokenService};
use crate::database::manager::DatabaseError;
use crate::database::models::{
    NewTodoItem, NewTodoList, NewUser, TodoItem, TodoList, UpdateItemInput, UpdateListInput,
};
use crate::database::repository::Repository;

pub use auth_service::AuthService;
pub use todo_item_service::TodoItemService;
pub use todo_list_service::TodoListService;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("update has no fields to set")]
    EmptyUpdate,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Database(DatabaseError),
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::EmptyUpdate => ServiceError::EmptyUpdate,
            other => ServiceError::Database(other),
        }
    }
}

#[async_trait]
pub trait Authorization: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<i32, ServiceError>;

    /// Exchange credentials for a bearer token
    async fn authenticate(&self, username: &str, password: &str) -> Result<String, ServiceError>;

    fn parse_token(&self, token: &str) -> Result<i32, ServiceError>;
}

#[async_trait]
pub trait TodoLists: Send + Sync {
    async fn create(&self, user_id: i32, list: NewTodoList) -> Result<i32, ServiceError>;

    async fn get_all(&self, user_id: i32) -> Result<Vec<TodoList>, ServiceError>;

    async fn get_by_id(&self, user_id: i32, list_id: i32) -> Result<TodoList, ServiceError>;

    async fn delete(&self, user_id: i32, list_id: i32) -> Result<(), ServiceError>;

    async fn update(
        &self,
        user_id: i32,
        list_id: i32,
        input: UpdateListInput,
    ) -> Result<(), ServiceError>;
}

#[async_trait]
pub trait TodoItems: Send + Sync {
    async fn create(
        &self,
        user_id: i32,
        list_id: i32,
        item: NewTodoItem,
    ) -> Result<i32, ServiceError>;

    async fn get_all(&self, user_id: i32, list_id: i32) -> Result<Vec<TodoItem>, ServiceError>;

    async fn get_by_id(&self, user_id: i32, item_id: i32) -> Result<TodoItem, ServiceError>;

    async fn delete(&self, user_id: i32, item_id: i32) -> Result<(), ServiceError>;

    async fn update(
        &self,
        user_id: i32,
        item_id: i32,
        input: UpdateItemInput,
    ) -> Result<(), ServiceError>;
}

/// Everything the HTTP layer can call
#[derive(Clone)]
pub struct Service {
    pub authorization: Arc<dyn Authorization>,
    pub todo_list: Arc<dyn TodoLists>,
    pub todo_item: Arc<dyn TodoItems>,
}

impl Service {
    pub fn new(repos: &Repository, hasher: PasswordHasher, tokens: TokenService) -> Self {
        Self {
            authorization: Arc::new(AuthService::new(repos.authorization.clone(), hasher, tokens)),
            todo_list: Arc::new(TodoListService::new(repos.todo_list.clone())),
            todo_item: Arc::new(TodoItemService::new(
                repos.todo_item.clone(),
                repos.todo_list.clone(),
            )),
        }
    }
}
