pub mod todo_item;
pub mod todo_list;
pub mod user;

pub use todo_item::{NewTodoItem, TodoItem, UpdateItemInput};
pub use todo_list::{NewTodoList, TodoList, UpdateListInput};
pub use user::{Credentials, NewUser, User};

/// Width of every `VARCHAR` text column in the schema
pub const MAX_TEXT_LEN: usize = 255;

/// Reject values the column would refuse; length is counted in characters.
pub(crate) fn check_len(field: &str, value: &str) -> Result<(), String> {
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(format!("{} must be at most {} characters", field, MAX_TEXT_LEN));
    }
    Ok(())
}
