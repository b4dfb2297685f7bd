//! In-memory stand-in for the Postgres repositories.
//!
//! Ownership is resolved through the same association tables the SQL joins
//! use, so services behave the same against either backend.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::database::manager::DatabaseError;
use crate::database::models::{
    NewTodoItem, NewTodoList, NewUser, TodoItem, TodoList, UpdateItemInput, UpdateListInput, User,
};
use crate::database::repository::{
    AuthRepository, Repository, TodoItemRepository, TodoListRepository,
};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, (User, String)>,
    todo_lists: BTreeMap<i32, TodoList>,
    users_lists: Vec<(i32, i32)>,
    todo_items: BTreeMap<i32, TodoItem>,
    lists_items: Vec<(i32, i32)>,
    next_id: BTreeMap<&'static str, i32>,
    fail_next_association: bool,
    writes: usize,
    rollbacks: usize,
}

impl Tables {
    fn next_id(&mut self, table: &'static str) -> i32 {
        let id = self.next_id.entry(table).or_insert(0);
        *id += 1;
        *id
    }

    fn owns_list(&self, user_id: i32, list_id: i32) -> bool {
        self.users_lists.contains(&(user_id, list_id))
    }

    fn owns_item(&self, user_id: i32, item_id: i32) -> bool {
        self.lists_items
            .iter()
            .any(|&(list_id, id)| id == item_id && self.owns_list(user_id, list_id))
    }

    fn take_association_failure(&mut self) -> Option<DatabaseError> {
        if std::mem::take(&mut self.fail_next_association) {
            let cause = sqlx::Error::Protocol("forced association failure".to_string());
            return Some(DatabaseError::Transaction(cause));
        }
        None
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    pub fn repository(self: &Arc<Self>) -> Repository {
        Repository {
            authorization: self.clone(),
            todo_list: self.clone(),
            todo_item: self.clone(),
        }
    }

    /// Insert a user directly, bypassing hashing; returns its id
    pub fn add_user(&self, username: &str) -> i32 {
        let mut t = self.tables();
        let id = t.next_id("users");
        let user = User {
            id,
            name: username.to_string(),
            username: username.to_string(),
        };
        t.users.insert(id, (user, String::new()));
        id
    }

    pub fn password_hash_of(&self, username: &str) -> Option<String> {
        self.tables()
            .users
            .values()
            .find(|(u, _)| u.username == username)
            .map(|(_, hash)| hash.clone())
    }

    /// Make the second insert of the next two-step create fail
    pub fn fail_next_association(&self) {
        self.tables().fail_next_association = true;
    }

    /// Number of successful mutating calls so far
    pub fn writes(&self) -> usize {
        self.tables().writes
    }

    pub fn list_count(&self) -> usize {
        self.tables().todo_lists.len()
    }

    pub fn item_count(&self) -> usize {
        self.tables().todo_items.len()
    }

    /// Primary rows removed again after a failed association insert
    pub fn rollbacks(&self) -> usize {
        self.tables().rollbacks
    }
}

#[async_trait]
impl AuthRepository for MemoryStore {
    async fn create_user(&self, user: &NewUser, password_hash: &str) -> Result<i32, DatabaseError> {
        let mut t = self.tables();
        if t.users.values().any(|(u, _)| u.username == user.username) {
            return Err(DatabaseError::Conflict(format!(
                "username '{}' is already taken",
                user.username
            )));
        }

        let id = t.next_id("users");
        let stored = User {
            id,
            name: user.name.clone(),
            username: user.username.clone(),
        };
        t.users.insert(id, (stored, password_hash.to_string()));
        t.writes += 1;
        Ok(id)
    }

    async fn get_user(&self, username: &str, password_hash: &str) -> Result<User, DatabaseError> {
        self.tables()
            .users
            .values()
            .find(|(u, hash)| u.username == username && hash == password_hash)
            .map(|(u, _)| u.clone())
            .ok_or_else(|| DatabaseError::NotFound("user not found".to_string()))
    }
}

#[async_trait]
impl TodoListRepository for MemoryStore {
    async fn create(&self, user_id: i32, list: &NewTodoList) -> Result<i32, DatabaseError> {
        let mut t = self.tables();

        let id = t.next_id("todo_lists");
        t.todo_lists.insert(
            id,
            TodoList {
                id,
                title: list.title.clone(),
                description: list.description.clone(),
            },
        );

        if let Some(err) = t.take_association_failure() {
            t.todo_lists.remove(&id);
            t.rollbacks += 1;
            return Err(err);
        }
        t.users_lists.push((user_id, id));
        t.writes += 1;
        Ok(id)
    }

    async fn get_all(&self, user_id: i32) -> Result<Vec<TodoList>, DatabaseError> {
        let t = self.tables();
        Ok(t.todo_lists
            .values()
            .filter(|l| t.owns_list(user_id, l.id))
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, user_id: i32, list_id: i32) -> Result<TodoList, DatabaseError> {
        let t = self.tables();
        t.todo_lists
            .get(&list_id)
            .filter(|_| t.owns_list(user_id, list_id))
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(format!("list {} not found", list_id)))
    }

    async fn delete(&self, user_id: i32, list_id: i32) -> Result<(), DatabaseError> {
        let mut t = self.tables();
        if t.owns_list(user_id, list_id) {
            t.todo_lists.remove(&list_id);
            // cascade, as the foreign keys do
            t.users_lists.retain(|&(_, l)| l != list_id);
            t.lists_items.retain(|&(l, _)| l != list_id);
            t.writes += 1;
        }
        Ok(())
    }

    async fn update(
        &self,
        user_id: i32,
        list_id: i32,
        input: &UpdateListInput,
    ) -> Result<(), DatabaseError> {
        if input.is_empty() {
            return Err(DatabaseError::EmptyUpdate);
        }

        let mut t = self.tables();
        if !t.owns_list(user_id, list_id) {
            return Err(DatabaseError::NotFound(format!("list {} not found", list_id)));
        }
        let list = t
            .todo_lists
            .get_mut(&list_id)
            .ok_or_else(|| DatabaseError::NotFound(format!("list {} not found", list_id)))?;

        if let Some(title) = &input.title {
            list.title = title.clone();
        }
        if let Some(description) = &input.description {
            list.description = Some(description.clone());
        }
        t.writes += 1;
        Ok(())
    }
}

#[async_trait]
impl TodoItemRepository for MemoryStore {
    async fn create(&self, list_id: i32, item: &NewTodoItem) -> Result<i32, DatabaseError> {
        let mut t = self.tables();

        let id = t.next_id("todo_items");
        t.todo_items.insert(
            id,
            TodoItem {
                id,
                title: item.title.clone(),
                description: item.description.clone(),
                done: false,
            },
        );

        // the association insert fails like the list foreign key would
        let failure = t.take_association_failure().or_else(|| {
            (!t.todo_lists.contains_key(&list_id)).then(|| {
                let cause = sqlx::Error::Protocol(format!("list {} does not exist", list_id));
                DatabaseError::Transaction(cause)
            })
        });
        if let Some(err) = failure {
            t.todo_items.remove(&id);
            t.rollbacks += 1;
            return Err(err);
        }
        t.lists_items.push((list_id, id));
        t.writes += 1;
        Ok(id)
    }

    async fn get_all(&self, user_id: i32, list_id: i32) -> Result<Vec<TodoItem>, DatabaseError> {
        let t = self.tables();
        if !t.owns_list(user_id, list_id) {
            return Ok(Vec::new());
        }
        Ok(t.todo_items
            .values()
            .filter(|i| t.lists_items.contains(&(list_id, i.id)))
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, user_id: i32, item_id: i32) -> Result<TodoItem, DatabaseError> {
        let t = self.tables();
        t.todo_items
            .get(&item_id)
            .filter(|_| t.owns_item(user_id, item_id))
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(format!("item {} not found", item_id)))
    }

    async fn delete(&self, user_id: i32, item_id: i32) -> Result<(), DatabaseError> {
        let mut t = self.tables();
        if t.owns_item(user_id, item_id) {
            t.todo_items.remove(&item_id);
            t.lists_items.retain(|&(_, i)| i != item_id);
            t.writes += 1;
        }
        Ok(())
    }

    async fn update(
        &self,
        user_id: i32,
        item_id: i32,
        input: &UpdateItemInput,
    ) -> Result<(), DatabaseError> {
        if input.is_empty() {
            return Err(DatabaseError::EmptyUpdate);
        }

        let mut t = self.tables();
        if !t.owns_item(user_id, item_id) {
            return Err(DatabaseError::NotFound(format!("item {} not found", item_id)));
        }
        let item = t
            .todo_items
            .get_mut(&item_id)
            .ok_or_else(|| DatabaseError::NotFound(format!("item {} not found", item_id)))?;

        if let Some(title) = &input.title {
            item.title = title.clone();
        }
        if let Some(description) = &input.description {
            item.description = Some(description.clone());
        }
        if let Some(done) = input.done {
            item.done = done;
        }
        t.writes += 1;
        Ok(())
    }
}
