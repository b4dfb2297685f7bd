use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::check_len;
use crate::database::patch::Patch;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TodoItem {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTodoItem {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewTodoItem {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title is required".to_string());
        }
        check_len("title", &self.title)?;
        match &self.description {
            Some(description) => check_len("description", description),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateItemInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub done: Option<bool>,
}

impl UpdateItemInput {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.done.is_none()
    }

    pub fn validate(&self) -> Result<(), String> {
        if matches!(&self.title, Some(title) if title.trim().is_empty()) {
            return Err("title must not be empty".to_string());
        }
        if let Some(title) = &self.title {
            check_len("title", title)?;
        }
        match &self.description {
            Some(description) => check_len("description", description),
            None => Ok(()),
        }
    }

    pub fn to_patch(&self) -> Patch {
        Patch::new()
            .set("title", self.title.clone())
            .set("description", self.description.clone())
            .set("done", self.done)
    }
}
