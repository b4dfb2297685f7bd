//! Ownership-scoped data access.
//!
//! Every list and item query carries the owning user in its join predicate;
//! nothing in here compares owner ids in Rust.

pub mod auth;
pub mod todo_item;
pub mod todo_list;

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    NewTodoItem, NewTodoList, NewUser, TodoItem, TodoList, UpdateItemInput, UpdateListInput, User,
};

pub use auth::AuthPostgres;
pub use todo_item::TodoItemPostgres;
pub use todo_list::TodoListPostgres;

#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// Insert a user with an already-hashed password; `Conflict` on a taken username.
    async fn create_user(&self, user: &NewUser, password_hash: &str) -> Result<i32, DatabaseError>;

    async fn get_user(&self, username: &str, password_hash: &str) -> Result<User, DatabaseError>;
}

#[async_trait]
pub trait TodoListRepository: Send + Sync {
    async fn create(&self, user_id: i32, list: &NewTodoList) -> Result<i32, DatabaseError>;

    async fn get_all(&self, user_id: i32) -> Result<Vec<TodoList>, DatabaseError>;

    async fn get_by_id(&self, user_id: i32, list_id: i32) -> Result<TodoList, DatabaseError>;

    async fn delete(&self, user_id: i32, list_id: i32) -> Result<(), DatabaseError>;

    async fn update(
        &self,
        user_id: i32,
        list_id: i32,
        input: &UpdateListInput,
    ) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait TodoItemRepository: Send + Sync {
    async fn create(&self, list_id: i32, item: &NewTodoItem) -> Result<i32, DatabaseError>;

    async fn get_all(&self, user_id: i32, list_id: i32) -> Result<Vec<TodoItem>, DatabaseError>;

    async fn get_by_id(&self, user_id: i32, item_id: i32) -> Result<TodoItem, DatabaseError>;

    async fn delete(&self, user_id: i32, item_id: i32) -> Result<(), DatabaseError>;

    async fn update(
        &self,
        user_id: i32,
        item_id: i32,
        input: &UpdateItemInput,
    ) -> Result<(), DatabaseError>;
}

/// One handle per capability, all sharing the same pool
#[derive(Clone)]
pub struct Repository {
    pub authorization: Arc<dyn AuthRepository>,
    pub todo_list: Arc<dyn TodoListRepository>,
    pub todo_item: Arc<dyn TodoItemRepository>,
}

impl Repository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            authorization: Arc::new(AuthPostgres::new(pool.clone())),
            todo_list: Arc::new(TodoListPostgres::new(pool.clone())),
            todo_item: Arc::new(TodoItemPostgres::new(pool)),
        }
    }
}
