use async_trait::async_trait;
use std::sync::Arc;

use super::{ServiceError, TodoItems};
use crate::database::models::{NewTodoItem, TodoItem, UpdateItemInput};
use crate::database::repository::{TodoItemRepository, TodoListRepository};

pub struct TodoItemService {
    repo: Arc<dyn TodoItemRepository>,
    list_repo: Arc<dyn TodoListRepository>,
}

impl TodoItemService {
    pub fn new(repo: Arc<dyn TodoItemRepository>, list_repo: Arc<dyn TodoListRepository>) -> Self {
        Self { repo, list_repo }
    }
}

#[async_trait]
impl TodoItems for TodoItemService {
    async fn create(
        &self,
        user_id: i32,
        list_id: i32,
        item: NewTodoItem,
    ) -> Result<i32, ServiceError> {
        item.validate().map_err(ServiceError::Validation)?;

        // list does not exist or does not belong to the user
        self.list_repo.get_by_id(user_id, list_id).await?;

        Ok(self.repo.create(list_id, &item).await?)
    }

    async fn get_all(&self, user_id: i32, list_id: i32) -> Result<Vec<TodoItem>, ServiceError> {
        Ok(self.repo.get_all(user_id, list_id).await?)
    }

    async fn get_by_id(&self, user_id: i32, item_id: i32) -> Result<TodoItem, ServiceError> {
        Ok(self.repo.get_by_id(user_id, item_id).await?)
    }

    async fn delete(&self, user_id: i32, item_id: i32) -> Result<(), ServiceError> {
        Ok(self.repo.delete(user_id, item_id).await?)
    }

    async fn update(
        &self,
        user_id: i32,
        item_id: i32,
        input: UpdateItemInput,
    ) -> Result<(), ServiceError> {
        if input.is_empty() {
            return Err(ServiceError::EmptyUpdate);
        }
        input.validate().map_err(ServiceError::Validation)?;

        Ok(self.repo.update(user_id, item_id, &input).await?)
    }
}
