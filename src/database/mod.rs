pub mod manager;
pub mod models;
pub mod patch;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use patch::{Patch, PatchValue};
pub use repository::{AuthRepository, Repository, TodoItemRepository, TodoListRepository};
