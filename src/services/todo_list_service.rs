use async_trait::async_trait;
use std::sync::Arc;

use super::{ServiceError, TodoLists};
use crate::database::models::{NewTodoList, TodoList, UpdateListInput};
use crate::database::repository::TodoListRepository;

pub struct TodoListService {
    repo: Arc<dyn TodoListRepository>,
}

impl TodoListService {
    pub fn new(repo: Arc<dyn TodoListRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl TodoLists for TodoListService {
    async fn create(&self, user_id: i32, list: NewTodoList) -> Result<i32, ServiceError> {
        list.validate().map_err(ServiceError::Validation)?;
        Ok(self.repo.create(user_id, &list).await?)
    }

    async fn get_all(&self, user_id: i32) -> Result<Vec<TodoList>, ServiceError> {
        Ok(self.repo.get_all(user_id).await?)
    }

    async fn get_by_id(&self, user_id: i32, list_id: i32) -> Result<TodoList, ServiceError> {
        Ok(self.repo.get_by_id(user_id, list_id).await?)
    }

    async fn delete(&self, user_id: i32, list_id: i32) -> Result<(), ServiceError> {
        Ok(self.repo.delete(user_id, list_id).await?)
    }

    async fn update(
        &self,
        user_id: i32,
        list_id: i32,
        input: UpdateListInput,
    ) -> Result<(), ServiceError> {
        if input.is_empty() {
            return Err(ServiceError::EmptyUpdate);
        }
        input.validate().map_err(ServiceError::Validation)?;

        Ok(self.repo.update(user_id, list_id, &input).await?)
    }
}
