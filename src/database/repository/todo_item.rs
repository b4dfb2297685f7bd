use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::TodoItemRepository;
use crate::database::manager::{abort, DatabaseError};
use crate::database::models::{NewTodoItem, TodoItem, UpdateItemInput};
use crate::database::patch::Patch;

const INSERT_ITEM: &str =
    "INSERT INTO todo_items (title, description) VALUES ($1, $2) RETURNING id";

const INSERT_LIST_ITEM: &str = "INSERT INTO lists_items (list_id, item_id) VALUES ($1, $2)";

const SELECT_ALL: &str = "SELECT ti.id, ti.title, ti.description, ti.done FROM todo_items ti \
     INNER JOIN lists_items li ON li.item_id = ti.id \
     INNER JOIN users_lists ul ON ul.list_id = li.list_id \
     WHERE li.list_id = $1 AND ul.user_id = $2 \
     ORDER BY ti.id";

const SELECT_ONE: &str = "SELECT ti.id, ti.title, ti.description, ti.done FROM todo_items ti \
     INNER JOIN lists_items li ON li.item_id = ti.id \
     INNER JOIN users_lists ul ON ul.list_id = li.list_id \
     WHERE ti.id = $1 AND ul.user_id = $2 \
     LIMIT 1";

const DELETE_ONE: &str = "DELETE FROM todo_items ti USING lists_items li, users_lists ul \
     WHERE ti.id = li.item_id AND li.list_id = ul.list_id \
     AND ul.user_id = $1 AND ti.id = $2";

/// Binds are the patch values, then user id, then item id.
pub(crate) fn update_sql(patch: &Patch) -> String {
    let next = patch.len() + 1;
    format!(
        "UPDATE todo_items ti SET {} FROM lists_items li, users_lists ul \
         WHERE ti.id = li.item_id AND li.list_id = ul.list_id \
         AND ul.user_id = ${} AND ti.id = ${}",
        patch.set_clause(1),
        next,
        next + 1
    )
}

pub struct TodoItemPostgres {
    pool: PgPool,
}

impl TodoItemPostgres {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoItemRepository for TodoItemPostgres {
    async fn create(&self, list_id: i32, item: &NewTodoItem) -> Result<i32, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let item_id = match sqlx::query_scalar::<_, i32>(INSERT_ITEM)
            .bind(&item.title)
            .bind(&item.description)
            .fetch_one(&mut *tx)
            .await
        {
            Ok(id) => id,
            Err(e) => return abort(tx, e).await,
        };

        if let Err(e) = sqlx::query(INSERT_LIST_ITEM)
            .bind(list_id)
            .bind(item_id)
            .execute(&mut *tx)
            .await
        {
            return abort(tx, e).await;
        }

        tx.commit().await.map_err(DatabaseError::Transaction)?;
        Ok(item_id)
    }

    async fn get_all(&self, user_id: i32, list_id: i32) -> Result<Vec<TodoItem>, DatabaseError> {
        let items = sqlx::query_as::<_, TodoItem>(SELECT_ALL)
            .bind(list_id)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn get_by_id(&self, user_id: i32, item_id: i32) -> Result<TodoItem, DatabaseError> {
        sqlx::query_as::<_, TodoItem>(SELECT_ONE)
            .bind(item_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("item {} not found", item_id)))
    }

    async fn delete(&self, user_id: i32, item_id: i32) -> Result<(), DatabaseError> {
        let result = sqlx::query(DELETE_ONE)
            .bind(user_id)
            .bind(item_id)
            .execute(&self.pool)
            .await?;

        debug!("delete item {}: {} row(s)", item_id, result.rows_affected());
        Ok(())
    }

    async fn update(
        &self,
        user_id: i32,
        item_id: i32,
        input: &UpdateItemInput,
    ) -> Result<(), DatabaseError> {
        let patch = input.to_patch();
        if patch.is_empty() {
            return Err(DatabaseError::EmptyUpdate);
        }

        let query = update_sql(&patch);
        debug!("update query: {} columns={:?}", query, patch.columns());

        let result = patch
            .bind(sqlx::query(&query))
            .bind(user_id)
            .bind(item_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("item {} not found", item_id)));
        }
        Ok(())
    }
}
